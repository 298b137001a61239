//! Placed bonds and lone pairs, kept in lockstep with the electron bank.
//!
//! Every mutator takes the session's [`ElectronLedger`] and either applies
//! both the store change and the ledger adjustment or neither.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::debug;

use super::error::Error;
use super::ledger::ElectronLedger;
use crate::model::molecule::AtomPair;
use crate::model::types::{BondOrder, Element, LONE_PAIR_COST};

/// Opaque label for one lone-pair position on an atom.
///
/// Slots carry no chemical meaning; they only let one atom hold several
/// independent lone pairs. Only the number of filled slots is validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(String);

impl SlotId {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SlotId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Outcome of a successful [`PlacementStore::place_bond`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondChange {
    Placed,
    /// The pair already held a bond of the requested order.
    Unchanged,
    Replaced { previous: BondOrder },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementStore {
    bonds: BTreeMap<AtomPair, BondOrder>,
    lone_pairs: BTreeSet<(usize, SlotId)>,
}

fn check_atom(atoms: &[Element], index: usize) -> Result<Element, Error> {
    atoms
        .get(index)
        .copied()
        .ok_or_else(|| Error::invalid_atom(index, atoms.len()))
}

impl PlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bond between `a` and `b` to `order`.
    ///
    /// An existing bond of another order is replaced in one step: the
    /// difference between the two costs is charged or refunded as a single
    /// signed ledger adjustment. If the bank cannot cover an increase,
    /// nothing changes.
    pub fn place_bond(
        &mut self,
        ledger: &mut ElectronLedger,
        atoms: &[Element],
        a: usize,
        b: usize,
        order: BondOrder,
    ) -> Result<BondChange, Error> {
        check_atom(atoms, a)?;
        check_atom(atoms, b)?;
        let pair = AtomPair::new(a, b).ok_or(Error::SelfBond(a))?;

        let previous = self.bonds.get(&pair).copied();
        if previous == Some(order) {
            return Ok(BondChange::Unchanged);
        }

        let old_cost = previous.map_or(0, |o| o.electron_cost());
        let delta = i64::from(order.electron_cost()) - i64::from(old_cost);
        ledger.apply_delta(delta)?;
        self.bonds.insert(pair, order);

        debug!(
            "bond {pair} set to {order} (delta {delta}, bank {})",
            ledger.remaining()
        );
        Ok(match previous {
            Some(previous) => BondChange::Replaced { previous },
            None => BondChange::Placed,
        })
    }

    /// Removes the bond between `a` and `b`, refunding its cost.
    ///
    /// Returns the removed order; absent, self or out-of-range pairs are a
    /// no-op returning `None`.
    pub fn remove_bond(
        &mut self,
        ledger: &mut ElectronLedger,
        a: usize,
        b: usize,
    ) -> Option<BondOrder> {
        let pair = AtomPair::new(a, b)?;
        let order = self.bonds.remove(&pair)?;
        ledger.refund(order.electron_cost());
        debug!("bond {pair} removed (bank {})", ledger.remaining());
        Some(order)
    }

    /// Fills one lone-pair slot on `atom`.
    ///
    /// Hydrogen is refused before the bank is consulted, so the refusal
    /// does not depend on the balance.
    pub fn place_lone_pair(
        &mut self,
        ledger: &mut ElectronLedger,
        atoms: &[Element],
        atom: usize,
        slot: SlotId,
    ) -> Result<(), Error> {
        if check_atom(atoms, atom)?.is_hydrogen() {
            return Err(Error::HydrogenLonePair(atom));
        }
        let key = (atom, slot);
        if self.lone_pairs.contains(&key) {
            return Err(Error::DuplicateSlot {
                atom,
                slot: key.1.to_string(),
            });
        }
        ledger.try_spend(LONE_PAIR_COST)?;
        debug!(
            "lone pair placed on atom {atom} slot '{}' (bank {})",
            key.1,
            ledger.remaining()
        );
        self.lone_pairs.insert(key);
        Ok(())
    }

    /// Empties one lone-pair slot. Returns `false` if it was not filled.
    pub fn remove_lone_pair(
        &mut self,
        ledger: &mut ElectronLedger,
        atom: usize,
        slot: &SlotId,
    ) -> bool {
        let removed = self.lone_pairs.remove(&(atom, slot.clone()));
        if removed {
            ledger.refund(LONE_PAIR_COST);
            debug!(
                "lone pair removed from atom {atom} slot '{slot}' (bank {})",
                ledger.remaining()
            );
        }
        removed
    }

    pub fn bond_order(&self, pair: AtomPair) -> Option<BondOrder> {
        self.bonds.get(&pair).copied()
    }

    #[inline]
    pub fn bonds(&self) -> &BTreeMap<AtomPair, BondOrder> {
        &self.bonds
    }

    /// Bonds touching `atom`, with the partner atom and order.
    pub fn bonds_of(&self, atom: usize) -> impl Iterator<Item = (usize, BondOrder)> + '_ {
        self.bonds
            .iter()
            .filter_map(move |(pair, &order)| pair.other(atom).map(|other| (other, order)))
    }

    pub fn lone_pair_count(&self, atom: usize) -> u8 {
        let n = self.lone_pairs.iter().filter(|(a, _)| *a == atom).count();
        u8::try_from(n).unwrap_or(u8::MAX)
    }

    /// Filled slot counts per atom. Atoms without lone pairs are absent.
    pub fn lone_pair_counts(&self) -> BTreeMap<usize, u8> {
        let mut counts = BTreeMap::new();
        for (atom, _) in &self.lone_pairs {
            let c: &mut u8 = counts.entry(*atom).or_default();
            *c = c.saturating_add(1);
        }
        counts
    }

    #[inline]
    pub fn lone_pairs(&self) -> &BTreeSet<(usize, SlotId)> {
        &self.lone_pairs
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty() && self.lone_pairs.is_empty()
    }

    /// Electrons tied up in the current placements.
    pub fn spent_electrons(&self) -> u32 {
        let bonds: u32 = self.bonds.values().map(BondOrder::electron_cost).sum();
        bonds + LONE_PAIR_COST * self.lone_pairs.len() as u32
    }

    /// Removes every placement and restores the bank.
    pub fn clear(&mut self, ledger: &mut ElectronLedger) {
        self.bonds.clear();
        self.lone_pairs.clear();
        ledger.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: [Element; 3] = [Element::O, Element::H, Element::H];
    const CO2: [Element; 3] = [Element::O, Element::C, Element::O];

    fn assert_in_sync(store: &PlacementStore, ledger: &ElectronLedger) {
        assert_eq!(
            ledger.remaining(),
            ledger.total() - store.spent_electrons(),
            "ledger drifted from store"
        );
    }

    #[test]
    fn water_scenario_spends_the_bank_exactly() {
        let mut ledger = ElectronLedger::new(8);
        let mut store = PlacementStore::new();

        store
            .place_bond(&mut ledger, &WATER, 0, 1, BondOrder::Single)
            .unwrap();
        assert_eq!(ledger.remaining(), 6);
        store
            .place_bond(&mut ledger, &WATER, 2, 0, BondOrder::Single)
            .unwrap();
        assert_eq!(ledger.remaining(), 4);
        store
            .place_lone_pair(&mut ledger, &WATER, 0, "a".into())
            .unwrap();
        store
            .place_lone_pair(&mut ledger, &WATER, 0, "b".into())
            .unwrap();
        assert_eq!(ledger.remaining(), 0);
        assert_eq!(store.lone_pair_count(0), 2);
        assert_in_sync(&store, &ledger);
    }

    #[test]
    fn replacing_order_applies_single_delta() {
        let mut ledger = ElectronLedger::new(16);
        let mut store = PlacementStore::new();

        let change = store
            .place_bond(&mut ledger, &CO2, 0, 1, BondOrder::Single)
            .unwrap();
        assert_eq!(change, BondChange::Placed);
        assert_eq!(ledger.remaining(), 14);

        let change = store
            .place_bond(&mut ledger, &CO2, 1, 0, BondOrder::Triple)
            .unwrap();
        assert_eq!(
            change,
            BondChange::Replaced {
                previous: BondOrder::Single
            }
        );
        assert_eq!(ledger.remaining(), 10);

        store
            .place_bond(&mut ledger, &CO2, 0, 1, BondOrder::Double)
            .unwrap();
        assert_eq!(ledger.remaining(), 12);
        assert_eq!(store.bonds().len(), 1);
        assert_in_sync(&store, &ledger);
    }

    #[test]
    fn placing_same_order_is_unchanged() {
        let mut ledger = ElectronLedger::new(16);
        let mut store = PlacementStore::new();
        store
            .place_bond(&mut ledger, &CO2, 0, 1, BondOrder::Double)
            .unwrap();
        let change = store
            .place_bond(&mut ledger, &CO2, 1, 0, BondOrder::Double)
            .unwrap();
        assert_eq!(change, BondChange::Unchanged);
        assert_eq!(ledger.remaining(), 12);
    }

    #[test]
    fn refused_upgrade_changes_nothing() {
        let mut ledger = ElectronLedger::new(4);
        let mut store = PlacementStore::new();
        store
            .place_bond(&mut ledger, &CO2, 0, 1, BondOrder::Single)
            .unwrap();
        let err = store
            .place_bond(&mut ledger, &CO2, 0, 1, BondOrder::Triple)
            .unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientElectrons {
                needed: 4,
                remaining: 2
            }
        );
        assert_eq!(
            store.bond_order(AtomPair::new(0, 1).unwrap()),
            Some(BondOrder::Single)
        );
        assert_eq!(ledger.remaining(), 2);
    }

    #[test]
    fn rejects_invalid_and_self_bonds() {
        let mut ledger = ElectronLedger::new(8);
        let mut store = PlacementStore::new();
        assert_eq!(
            store
                .place_bond(&mut ledger, &WATER, 0, 3, BondOrder::Single)
                .unwrap_err(),
            Error::InvalidAtom { index: 3, count: 3 }
        );
        assert_eq!(
            store
                .place_bond(&mut ledger, &WATER, 1, 1, BondOrder::Single)
                .unwrap_err(),
            Error::SelfBond(1)
        );
        assert!(store.is_empty());
        assert_eq!(ledger.remaining(), 8);
    }

    #[test]
    fn removing_absent_bond_is_noop() {
        let mut ledger = ElectronLedger::new(8);
        let mut store = PlacementStore::new();
        store
            .place_bond(&mut ledger, &WATER, 0, 1, BondOrder::Single)
            .unwrap();
        assert_eq!(store.remove_bond(&mut ledger, 1, 2), None);
        assert_eq!(store.remove_bond(&mut ledger, 1, 1), None);
        assert_eq!(store.remove_bond(&mut ledger, 0, 99), None);
        assert_eq!(ledger.remaining(), 6);
        assert_eq!(store.remove_bond(&mut ledger, 1, 0), Some(BondOrder::Single));
        assert_eq!(ledger.remaining(), 8);
        assert_eq!(store.remove_bond(&mut ledger, 0, 1), None);
        assert_eq!(ledger.remaining(), 8);
    }

    #[test]
    fn bond_round_trip_restores_bank() {
        let mut ledger = ElectronLedger::new(16);
        let mut store = PlacementStore::new();
        let steps = [
            (0, 1, BondOrder::Single),
            (1, 2, BondOrder::Double),
            (1, 0, BondOrder::Triple),
            (2, 1, BondOrder::Single),
            (0, 2, BondOrder::Double),
        ];
        for (a, b, o) in steps {
            let _ = store.place_bond(&mut ledger, &CO2, a, b, o);
            assert_in_sync(&store, &ledger);
        }
        store.remove_bond(&mut ledger, 2, 0);
        store.remove_bond(&mut ledger, 0, 1);
        store.remove_bond(&mut ledger, 1, 2);
        assert!(store.is_empty());
        assert_eq!(ledger.remaining(), ledger.total());
    }

    #[test]
    fn hydrogen_lone_pair_refused_regardless_of_bank() {
        for total in [0, 2, 100] {
            let mut ledger = ElectronLedger::new(total);
            let mut store = PlacementStore::new();
            let err = store
                .place_lone_pair(&mut ledger, &WATER, 1, "0".into())
                .unwrap_err();
            assert_eq!(err, Error::HydrogenLonePair(1));
            assert_eq!(ledger.remaining(), total);
            assert!(store.is_empty());
        }
    }

    #[test]
    fn duplicate_slot_never_double_charges() {
        let mut ledger = ElectronLedger::new(8);
        let mut store = PlacementStore::new();
        store
            .place_lone_pair(&mut ledger, &WATER, 0, "top".into())
            .unwrap();
        let err = store
            .place_lone_pair(&mut ledger, &WATER, 0, "top".into())
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateSlot { atom: 0, .. }));
        assert_eq!(ledger.remaining(), 6);
        assert_eq!(store.lone_pair_count(0), 1);
    }

    #[test]
    fn lone_pair_refused_when_bank_empty() {
        let mut ledger = ElectronLedger::new(0);
        let mut store = PlacementStore::new();
        let err = store
            .place_lone_pair(&mut ledger, &WATER, 0, "0".into())
            .unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientElectrons {
                needed: 2,
                remaining: 0
            }
        );
        assert!(store.is_empty());
    }

    #[test]
    fn remove_lone_pair_refunds_once() {
        let mut ledger = ElectronLedger::new(8);
        let mut store = PlacementStore::new();
        store
            .place_lone_pair(&mut ledger, &WATER, 0, "x".into())
            .unwrap();
        assert!(store.remove_lone_pair(&mut ledger, 0, &"x".into()));
        assert!(!store.remove_lone_pair(&mut ledger, 0, &"x".into()));
        assert_eq!(ledger.remaining(), 8);
    }

    #[test]
    fn counts_and_adjacency_queries() {
        let mut ledger = ElectronLedger::new(16);
        let mut store = PlacementStore::new();
        store
            .place_bond(&mut ledger, &CO2, 0, 1, BondOrder::Double)
            .unwrap();
        store
            .place_bond(&mut ledger, &CO2, 2, 1, BondOrder::Single)
            .unwrap();
        store
            .place_lone_pair(&mut ledger, &CO2, 2, "0".into())
            .unwrap();
        store
            .place_lone_pair(&mut ledger, &CO2, 2, "1".into())
            .unwrap();

        let mut around_c: Vec<_> = store.bonds_of(1).collect();
        around_c.sort();
        assert_eq!(
            around_c,
            vec![(0, BondOrder::Double), (2, BondOrder::Single)]
        );
        assert_eq!(store.lone_pair_counts(), BTreeMap::from([(2, 2)]));
        assert_eq!(store.lone_pair_count(0), 0);
        assert_eq!(store.spent_electrons(), 10);
    }

    #[test]
    fn clear_empties_store_and_restores_bank() {
        let mut ledger = ElectronLedger::new(8);
        let mut store = PlacementStore::new();
        store
            .place_bond(&mut ledger, &WATER, 0, 1, BondOrder::Single)
            .unwrap();
        store
            .place_lone_pair(&mut ledger, &WATER, 0, "0".into())
            .unwrap();
        store.clear(&mut ledger);
        assert!(store.is_empty());
        assert_eq!(ledger.remaining(), 8);
    }
}
