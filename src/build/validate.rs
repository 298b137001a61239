//! Comparison of a learner's placements against a molecule's answer key.

use std::collections::BTreeSet;

use super::ledger::ElectronLedger;
use super::placement::PlacementStore;
use crate::model::molecule::{AtomPair, CentralAtom, CentralChoice, Molecule};
use crate::model::types::BondOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    /// An expected bond was not placed.
    Missing,
    /// The bond exists with the wrong order.
    WrongOrder,
    /// A bond joins two atoms that should not be directly connected.
    Unexpected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BondMismatch {
    pub pair: AtomPair,
    pub expected: Option<BondOrder>,
    pub placed: Option<BondOrder>,
}

impl BondMismatch {
    pub fn kind(&self) -> MismatchKind {
        match (self.expected, self.placed) {
            (Some(_), None) => MismatchKind::Missing,
            (None, _) => MismatchKind::Unexpected,
            (Some(_), Some(_)) => MismatchKind::WrongOrder,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LonePairMismatch {
    pub atom: usize,
    pub expected: u8,
    pub placed: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentralCheck {
    Correct,
    Incorrect,
    NotChosen,
}

/// Result of comparing placements with the answer key.
///
/// Mismatches are listed in a stable order (expected bonds first, then
/// unexpected bonds by pair, then atoms by index), so the same final
/// placements always produce an equal verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub bond_mismatches: Vec<BondMismatch>,
    pub lone_pair_mismatches: Vec<LonePairMismatch>,
    pub bank_remaining: u32,
    pub central: CentralCheck,
}

impl Verdict {
    /// True when bonds and lone pairs match and the bank is empty.
    ///
    /// The central-atom check does not take part; it only feeds hints.
    pub fn is_correct(&self) -> bool {
        self.bond_mismatches.is_empty()
            && self.lone_pair_mismatches.is_empty()
            && self.bank_remaining == 0
    }

    pub fn bank_empty(&self) -> bool {
        self.bank_remaining == 0
    }

    pub fn central_ok(&self) -> bool {
        !matches!(self.central, CentralCheck::Incorrect)
    }
}

/// Checks a central-atom choice against the molecule's designation.
///
/// Diatomic molecules are correct only with [`CentralChoice::None`].
pub fn check_central(molecule: &Molecule, choice: Option<CentralChoice>) -> CentralCheck {
    let Some(choice) = choice else {
        return CentralCheck::NotChosen;
    };
    let ok = match (molecule.central(), choice) {
        (CentralAtom::None, CentralChoice::None) => true,
        (CentralAtom::Candidates(_), CentralChoice::Atom(i)) => molecule.central().accepts(i),
        _ => false,
    };
    if ok {
        CentralCheck::Correct
    } else {
        CentralCheck::Incorrect
    }
}

pub fn validate(
    molecule: &Molecule,
    store: &PlacementStore,
    ledger: &ElectronLedger,
    chosen_central: Option<CentralChoice>,
) -> Verdict {
    let mut bond_mismatches = Vec::new();
    let mut expected_pairs = BTreeSet::new();

    for bond in molecule.expected_bonds() {
        expected_pairs.insert(bond.pair);
        let placed = store.bond_order(bond.pair);
        if placed != Some(bond.order) {
            bond_mismatches.push(BondMismatch {
                pair: bond.pair,
                expected: Some(bond.order),
                placed,
            });
        }
    }

    for (&pair, &order) in store.bonds() {
        if !expected_pairs.contains(&pair) {
            bond_mismatches.push(BondMismatch {
                pair,
                expected: None,
                placed: Some(order),
            });
        }
    }

    let lone_pair_mismatches = molecule
        .expected_lone_pairs()
        .iter()
        .filter_map(|(&atom, &expected)| {
            let placed = store.lone_pair_count(atom);
            (placed != expected).then_some(LonePairMismatch {
                atom,
                expected,
                placed,
            })
        })
        .collect();

    Verdict {
        bond_mismatches,
        lone_pair_mismatches,
        bank_remaining: ledger.remaining(),
        central: check_central(molecule, chosen_central),
    }
}
