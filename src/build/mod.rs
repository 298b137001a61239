//! Building and checking a Lewis structure for one molecule.
//!
//! A [`BuildSession`] walks a learner through the steps of an attempt:
//!
//! 1. Confirm the total number of valence electrons, which opens the
//!    electron bank ([`ElectronLedger`]).
//! 2. Lock a central atom, or "none" for a diatomic molecule.
//! 3. Place and remove bonds and lone pairs ([`PlacementStore`]). Each
//!    placement draws from the bank and each removal refunds it.
//! 4. Check the structure: [`validate`] compares it with the answer key
//!    and [`classify`] turns the result into hint categories.
//!
//! The [`Coach`] offers a next-step suggestion at any point without
//! changing the session.

mod coach;
mod config;
mod error;
mod feedback;
mod ledger;
mod placement;
mod session;
mod validate;

pub use coach::{Coach, Prompt};
pub use config::{CentralPolicy, CoachConfig};
pub use error::{Error, ErrorKind};
pub use feedback::{Feedback, HintCategory, classify};
pub use ledger::ElectronLedger;
pub use placement::{BondChange, PlacementStore, SlotId};
pub use session::{BuildSession, CheckReport, ElectronCount, Phase};
pub use validate::{
    BondMismatch, CentralCheck, LonePairMismatch, MismatchKind, Verdict, check_central, validate,
};
