//! The validation core of a Lewis (electron-dot) structure trainer.
//!
//! A learner counts the valence electrons of a small covalent molecule,
//! picks its central atom, then spends the electrons on bonds and lone
//! pairs. This crate keeps the electron bank honest while they build and
//! reports, by category only, what is still wrong when they check.
//!
//! # Features
//!
//! - **Molecule catalog** — Built-in answer keys for seventeen practice
//!   molecules, plus loading of custom catalogs from TOML
//! - **Electron bank** — Every placement draws from the bank and every
//!   removal refunds it; a placement the bank cannot cover is refused
//!   without side effects
//! - **Structure checking** — Missing, wrong-order and unexpected bonds,
//!   lone-pair counts, and leftover electrons
//! - **Hints** — Category-level feedback that never reveals which atom is
//!   wrong, with optional molecule-specific nudges
//! - **Coaching** — Next-step suggestions computed from the learner's own
//!   drawing (octet tallies, disconnected atoms, bond upgrades)
//! - **Practice sets** — Seeded, non-repeating runs of molecules with
//!   attempt counts and a summary
//!
//! # Quick Start
//!
//! ```
//! use lewis_coach::{BondOrder, BuildSession, Catalog, CentralChoice, CoachConfig};
//! use lewis_coach::{ElectronCount, HintCategory};
//!
//! // Carbon dioxide: O=C=O, 16 valence electrons
//! let co2 = Catalog::builtin().get("CO2").unwrap();
//! let mut session = BuildSession::new(co2, CoachConfig::default());
//!
//! assert_eq!(session.confirm_electron_count(16)?, ElectronCount::Correct);
//! session.lock_central(CentralChoice::Atom(1))?;
//!
//! // A first try with single bonds
//! session.place_bond(0, 1, BondOrder::Single)?;
//! session.place_bond(1, 2, BondOrder::Single)?;
//! for atom in [0, 2] {
//!     for slot in ["n", "e", "s"] {
//!         session.place_lone_pair(atom, slot)?;
//!     }
//! }
//! assert_eq!(session.bank_remaining(), Some(0));
//!
//! let report = session.check()?;
//! assert!(!report.feedback.is_correct());
//! assert_eq!(
//!     report.feedback.hints(),
//!     &[HintCategory::BondingPattern, HintCategory::LonePairs]
//! );
//!
//! // Upgrade both bonds and drop one lone pair from each oxygen
//! session.remove_lone_pair(0, "s")?;
//! session.remove_lone_pair(2, "s")?;
//! session.place_bond(0, 1, BondOrder::Double)?;
//! session.place_bond(1, 2, BondOrder::Double)?;
//!
//! assert!(session.check()?.feedback.is_correct());
//! assert!(session.is_solved());
//! # Ok::<(), lewis_coach::BuildError>(())
//! ```
//!
//! # Data Types
//!
//! - [`Catalog`] — Answer keys, unique by formula
//! - [`Molecule`] — Atoms by index, expected bonds and lone pairs, central atom
//! - [`Element`] — Supported elements and their valence electrons
//! - [`BondOrder`] — Single, double, triple
//! - [`AtomPair`] — Unordered pair of atom indices; the only bond key
//!
//! # Building
//!
//! - [`BuildSession`] — One attempt at one molecule
//! - [`ElectronLedger`] / [`PlacementStore`] — The bank and the placements
//! - [`validate`] / [`Verdict`] — Comparison with the answer key
//! - [`classify`] / [`Feedback`] — Hint categories
//! - [`Coach`] / [`Prompt`] — Next-step suggestions
//! - [`CoachConfig`] — Hints, tips, and central-atom policy
//!
//! # Practice
//!
//! - [`PracticeSet`] — A seeded run of molecules
//! - [`PracticeSummary`] — Correct count, attempts, common mistakes, times

mod build;
mod catalog;
mod model;
mod practice;
mod rng;

pub use model::geometry::Geometry;
pub use model::molecule::{AtomPair, Bond, CentralAtom, CentralChoice, Molecule, MoleculeError};
pub use model::types::{
    BondOrder, Element, LONE_PAIR_COST, ParseBondOrderError, ParseElementError, total_valence,
};

pub use catalog::{Catalog, Inconsistency};

pub use build::{
    BondChange, BondMismatch, BuildSession, CentralCheck, CentralPolicy, CheckReport, Coach,
    CoachConfig, ElectronCount, ElectronLedger, ErrorKind, Feedback, HintCategory,
    LonePairMismatch, MismatchKind, Phase, PlacementStore, Prompt, SlotId, Verdict, check_central,
    classify, validate,
};

pub use practice::{
    ErrorTally, MoleculeRecord, PracticeError, PracticeOptions, PracticeSet, PracticeSummary,
};

pub use rng::Picker;

pub use build::Error as BuildError;
pub use catalog::Error as CatalogError;
