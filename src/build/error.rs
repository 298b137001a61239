//! Error types for build-session operations.
//!
//! Every variant is a refusal: the operation did not happen and no state
//! was changed. [`Error::kind`] groups the variants for callers that only
//! need to know what sort of refusal occurred.

use thiserror::Error;

use super::session::Phase;

/// Broad classes of refusal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request referred to something that does not exist.
    InvalidInput,
    /// The electron bank cannot cover the cost.
    InsufficientElectrons,
    /// The request breaks a structural rule.
    RuleViolation,
    /// The session is not at a step where the request is allowed.
    InvalidState,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("atom {index} does not exist (molecule has {count} atoms)")]
    InvalidAtom { index: usize, count: usize },

    #[error("an atom cannot bond to itself (atom {0})")]
    SelfBond(usize),

    /// The placement would drive the electron bank below zero.
    #[error("not enough electrons: need {needed}, only {remaining} left in the bank")]
    InsufficientElectrons { needed: u32, remaining: u32 },

    #[error("hydrogen never carries lone pairs (atom {0})")]
    HydrogenLonePair(usize),

    #[error("lone-pair slot '{slot}' on atom {atom} is already filled")]
    DuplicateSlot { atom: usize, slot: String },

    /// Only raised under the strict central-atom policy.
    #[error("that is not the central atom for this molecule")]
    WrongCentralAtom,

    #[error("cannot {action} while {phase}")]
    WrongPhase { action: &'static str, phase: Phase },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidAtom { .. } | Error::SelfBond(_) => ErrorKind::InvalidInput,
            Error::InsufficientElectrons { .. } => ErrorKind::InsufficientElectrons,
            Error::HydrogenLonePair(_) | Error::DuplicateSlot { .. } | Error::WrongCentralAtom => {
                ErrorKind::RuleViolation
            }
            Error::WrongPhase { .. } => ErrorKind::InvalidState,
        }
    }

    pub(crate) fn invalid_atom(index: usize, count: usize) -> Self {
        Self::InvalidAtom { index, count }
    }

    pub(crate) fn wrong_phase(action: &'static str, phase: Phase) -> Self {
        Self::WrongPhase { action, phase }
    }
}
