//! Step-by-step nudges for a build in progress.
//!
//! The coach reads a session and suggests what to do next. It never
//! changes anything, and unlike check feedback it may point at specific
//! atoms: it describes the learner's own drawing, not the answer key.

use std::fmt;

use super::placement::PlacementStore;
use super::session::Phase;
use crate::model::molecule::{AtomPair, CentralChoice, Molecule};
use crate::model::types::{BondOrder, LONE_PAIR_COST};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    CountElectrons,
    ChooseCentral,
    /// Nothing is bonded yet.
    BuildSkeleton,
    ConnectAtoms { atoms: Vec<usize> },
    AddLonePairs { atom: usize, remaining: u32 },
    UpgradeBond { a: usize, b: usize, to: BondOrder },
    MultipleBondNeeded { atom: usize },
    SpendBank { remaining: u32 },
    ReadyToCheck,
    Solved,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prompt::CountElectrons => {
                write!(f, "Start by counting the total valence electrons.")
            }
            Prompt::ChooseCentral => {
                write!(f, "Next, choose the central atom before building.")
            }
            Prompt::BuildSkeleton => write!(
                f,
                "Build the skeleton first: single bonds from the central atom to the outer atoms."
            ),
            Prompt::ConnectAtoms { atoms } => {
                let list: Vec<String> = atoms.iter().map(|a| a.to_string()).collect();
                write!(
                    f,
                    "Some atoms are not connected yet ({}). Every atom must be part of the molecule.",
                    list.join(", ")
                )
            }
            Prompt::AddLonePairs { atom, remaining } => write!(
                f,
                "You still have {remaining} electrons left. Add lone pairs to help atom {atom} reach its target."
            ),
            Prompt::UpgradeBond { a, b, to } => write!(
                f,
                "You are out of electrons but an atom still needs more. Consider making the {a}-{b} bond {}.",
                to.to_string().to_lowercase()
            ),
            Prompt::MultipleBondNeeded { atom } => write!(
                f,
                "You are out of electrons but atom {atom} is still short. Consider a double or triple bond."
            ),
            Prompt::SpendBank { remaining } => write!(
                f,
                "You have {remaining} electrons remaining. Use the bank until it reaches 0."
            ),
            Prompt::ReadyToCheck => write!(f, "Looking good. Check the structure when ready."),
            Prompt::Solved => write!(f, "Solved."),
        }
    }
}

/// Read-only view over a session used to compute per-atom tallies and
/// the next prompt.
#[derive(Debug, Clone, Copy)]
pub struct Coach<'a> {
    molecule: &'a Molecule,
    store: &'a PlacementStore,
    phase: Phase,
    central: Option<CentralChoice>,
    bank_remaining: u32,
}

impl<'a> Coach<'a> {
    pub(crate) fn new(
        molecule: &'a Molecule,
        store: &'a PlacementStore,
        phase: Phase,
        central: Option<CentralChoice>,
        bank_remaining: u32,
    ) -> Self {
        Self {
            molecule,
            store,
            phase,
            central,
            bank_remaining,
        }
    }

    /// Electrons an atom "sees": two per bond order plus two per lone pair.
    pub fn electrons_around(&self, atom: usize) -> u32 {
        let bonded: u32 = self
            .store
            .bonds_of(atom)
            .map(|(_, order)| order.electron_cost())
            .sum();
        bonded + LONE_PAIR_COST * u32::from(self.store.lone_pair_count(atom))
    }

    /// Atoms whose tally differs from their duet or octet target.
    pub fn unsatisfied_atoms(&self) -> Vec<usize> {
        self.molecule
            .atoms()
            .iter()
            .enumerate()
            .filter(|&(i, el)| self.electrons_around(i) != el.octet_target())
            .map(|(i, _)| i)
            .collect()
    }

    /// Atoms with no placed bond. Empty for single-atom molecules.
    pub fn disconnected_atoms(&self) -> Vec<usize> {
        if self.molecule.atom_count() < 2 {
            return Vec::new();
        }
        (0..self.molecule.atom_count())
            .filter(|&i| self.store.bonds_of(i).next().is_none())
            .collect()
    }

    fn prefer_heavy(&self, atoms: &[usize]) -> Option<usize> {
        atoms
            .iter()
            .copied()
            .find(|&i| self.molecule.atom(i).is_some_and(|el| !el.is_hydrogen()))
            .or_else(|| atoms.first().copied())
    }

    /// A bond from the chosen central atom to a short outer atom that
    /// could take one more shared pair.
    fn upgrade_candidate(&self, short: &[usize]) -> Option<Prompt> {
        let Some(CentralChoice::Atom(central)) = self.central else {
            return None;
        };
        let heavy: Vec<usize> = short
            .iter()
            .copied()
            .filter(|&i| self.molecule.atom(i).is_some_and(|el| !el.is_hydrogen()))
            .collect();
        let target = heavy
            .iter()
            .copied()
            .find(|&i| i != central)
            .or_else(|| heavy.first().copied())?;
        let pair = AtomPair::new(central, target)?;
        let to = self.store.bond_order(pair)?.upgraded()?;
        Some(Prompt::UpgradeBond {
            a: central,
            b: target,
            to,
        })
    }

    pub fn next_prompt(&self) -> Prompt {
        match self.phase {
            Phase::AwaitingElectronCount => return Prompt::CountElectrons,
            Phase::ElectronCountConfirmed => return Prompt::ChooseCentral,
            Phase::Solved => return Prompt::Solved,
            Phase::CentralAtomLocked | Phase::Building => {}
        }

        if self.store.bonds().is_empty() && self.molecule.atom_count() > 1 {
            return Prompt::BuildSkeleton;
        }
        let loose = self.disconnected_atoms();
        if !loose.is_empty() {
            return Prompt::ConnectAtoms { atoms: loose };
        }

        let short = self.unsatisfied_atoms();
        if let Some(atom) = self.prefer_heavy(&short) {
            if self.bank_remaining > 0 {
                return Prompt::AddLonePairs {
                    atom,
                    remaining: self.bank_remaining,
                };
            }
            return self
                .upgrade_candidate(&short)
                .unwrap_or(Prompt::MultipleBondNeeded { atom });
        }

        if self.bank_remaining > 0 {
            return Prompt::SpendBank {
                remaining: self.bank_remaining,
            };
        }
        Prompt::ReadyToCheck
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::ledger::ElectronLedger;
    use crate::catalog::Catalog;

    fn coach<'a>(
        mol: &'a Molecule,
        store: &'a PlacementStore,
        ledger: &ElectronLedger,
        central: usize,
    ) -> Coach<'a> {
        Coach::new(
            mol,
            store,
            Phase::Building,
            Some(CentralChoice::Atom(central)),
            ledger.remaining(),
        )
    }

    #[test]
    fn early_phases_prompt_for_steps() {
        let mol = Catalog::builtin().get("H2O").unwrap();
        let store = PlacementStore::new();
        let c = Coach::new(mol, &store, Phase::AwaitingElectronCount, None, 0);
        assert_eq!(c.next_prompt(), Prompt::CountElectrons);
        let c = Coach::new(mol, &store, Phase::ElectronCountConfirmed, None, 8);
        assert_eq!(c.next_prompt(), Prompt::ChooseCentral);
        let c = Coach::new(
            mol,
            &store,
            Phase::CentralAtomLocked,
            Some(CentralChoice::Atom(0)),
            8,
        );
        assert_eq!(c.next_prompt(), Prompt::BuildSkeleton);
    }

    #[test]
    fn water_walkthrough() {
        let mol = Catalog::builtin().get("H2O").unwrap();
        let mut ledger = ElectronLedger::new(8);
        let mut store = PlacementStore::new();

        store
            .place_bond(&mut ledger, mol.atoms(), 0, 1, BondOrder::Single)
            .unwrap();
        assert_eq!(
            coach(mol, &store, &ledger, 0).next_prompt(),
            Prompt::ConnectAtoms { atoms: vec![2] }
        );

        store
            .place_bond(&mut ledger, mol.atoms(), 0, 2, BondOrder::Single)
            .unwrap();
        let c = coach(mol, &store, &ledger, 0);
        assert_eq!(c.electrons_around(0), 4);
        assert_eq!(c.electrons_around(1), 2);
        assert_eq!(c.unsatisfied_atoms(), vec![0]);
        assert_eq!(
            c.next_prompt(),
            Prompt::AddLonePairs {
                atom: 0,
                remaining: 4
            }
        );

        store
            .place_lone_pair(&mut ledger, mol.atoms(), 0, "0".into())
            .unwrap();
        store
            .place_lone_pair(&mut ledger, mol.atoms(), 0, "1".into())
            .unwrap();
        let c = coach(mol, &store, &ledger, 0);
        assert!(c.unsatisfied_atoms().is_empty());
        assert_eq!(c.next_prompt(), Prompt::ReadyToCheck);
    }

    #[test]
    fn suggests_upgrade_when_bank_is_spent() {
        let mol = Catalog::builtin().get("CO2").unwrap();
        let mut ledger = ElectronLedger::new(16);
        let mut store = PlacementStore::new();
        store
            .place_bond(&mut ledger, mol.atoms(), 0, 1, BondOrder::Single)
            .unwrap();
        store
            .place_bond(&mut ledger, mol.atoms(), 1, 2, BondOrder::Single)
            .unwrap();
        for atom in [0, 2] {
            for slot in ["0", "1", "2"] {
                store
                    .place_lone_pair(&mut ledger, mol.atoms(), atom, slot.into())
                    .unwrap();
            }
        }
        assert_eq!(ledger.remaining(), 0);
        let c = coach(mol, &store, &ledger, 1);
        assert_eq!(c.unsatisfied_atoms(), vec![1]);
        assert_eq!(c.next_prompt(), Prompt::MultipleBondNeeded { atom: 1 });
    }

    #[test]
    fn upgrade_prompt_targets_short_outer_atom() {
        let mol = Catalog::builtin().get("N2").unwrap();
        let mut ledger = ElectronLedger::new(10);
        let mut store = PlacementStore::new();
        store
            .place_bond(&mut ledger, mol.atoms(), 0, 1, BondOrder::Double)
            .unwrap();
        store
            .place_lone_pair(&mut ledger, mol.atoms(), 0, "0".into())
            .unwrap();
        store
            .place_lone_pair(&mut ledger, mol.atoms(), 1, "0".into())
            .unwrap();
        store
            .place_lone_pair(&mut ledger, mol.atoms(), 1, "1".into())
            .unwrap();
        assert_eq!(ledger.remaining(), 0);
        let c = coach(mol, &store, &ledger, 1);
        assert_eq!(
            c.next_prompt(),
            Prompt::UpgradeBond {
                a: 1,
                b: 0,
                to: BondOrder::Triple
            }
        );
    }

    #[test]
    fn leftover_bank_with_satisfied_atoms() {
        let mol = Catalog::builtin().get("H2").unwrap();
        let mut ledger = ElectronLedger::new(4);
        let mut store = PlacementStore::new();
        store
            .place_bond(&mut ledger, mol.atoms(), 0, 1, BondOrder::Single)
            .unwrap();
        let c = coach(mol, &store, &ledger, 0);
        assert_eq!(c.next_prompt(), Prompt::SpendBank { remaining: 2 });
    }

    #[test]
    fn prompts_render_as_sentences() {
        assert!(
            Prompt::UpgradeBond {
                a: 0,
                b: 1,
                to: BondOrder::Double
            }
            .to_string()
            .contains("0-1 bond double")
        );
        assert!(Prompt::ConnectAtoms { atoms: vec![2, 3] }
            .to_string()
            .contains("(2, 3)"));
    }
}
