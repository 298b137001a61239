//! Error type for catalog loading and lookup.

use thiserror::Error;

use crate::model::molecule::MoleculeError;

/// Errors raised while parsing a molecule catalog or looking up an entry.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog text is not valid TOML or does not match the table layout.
    #[error("failed to parse molecule catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown element symbol '{symbol}' in '{formula}'")]
    UnknownElement { formula: String, symbol: String },

    #[error("molecule '{0}' has no atoms")]
    EmptyMolecule(String),

    /// A bond triple names an atom outside the molecule, pairs an atom with
    /// itself, or uses an order other than 1, 2 or 3.
    #[error("invalid bond {a}-{b} in '{formula}': {detail}")]
    InvalidBond {
        formula: String,
        a: usize,
        b: usize,
        detail: String,
    },

    #[error("duplicate bond between atoms {a} and {b} in '{formula}'")]
    DuplicateBond { formula: String, a: usize, b: usize },

    #[error("invalid lone pairs in '{formula}': {detail}")]
    InvalidLonePairs { formula: String, detail: String },

    #[error("central atom {atom} is out of range in '{formula}'")]
    InvalidCentral { formula: String, atom: usize },

    #[error("formula '{0}' appears more than once in the catalog")]
    DuplicateFormula(String),

    #[error("no molecule with formula '{0}' in the catalog")]
    UnknownFormula(String),
}

impl From<MoleculeError> for Error {
    fn from(e: MoleculeError) -> Self {
        match e {
            MoleculeError::Empty(formula) => Error::EmptyMolecule(formula),
            MoleculeError::InvalidBond {
                formula,
                a,
                b,
                detail,
            } => Error::invalid_bond(formula, a, b, detail),
            MoleculeError::DuplicateBond { formula, pair } => Error::DuplicateBond {
                formula,
                a: pair.lo(),
                b: pair.hi(),
            },
            MoleculeError::LonePairLength {
                formula,
                expected,
                got,
            } => Error::InvalidLonePairs {
                formula,
                detail: format!("expected {expected} entries, found {got}"),
            },
            MoleculeError::HydrogenLonePair { formula, atom } => Error::InvalidLonePairs {
                formula,
                detail: format!("atom {atom} is hydrogen and cannot carry lone pairs"),
            },
            MoleculeError::InvalidCentral { formula, atom } => {
                Error::InvalidCentral { formula, atom }
            }
        }
    }
}

impl Error {
    /// Creates an [`InvalidBond`](Error::InvalidBond) error.
    pub fn invalid_bond(
        formula: impl Into<String>,
        a: usize,
        b: usize,
        detail: impl Into<String>,
    ) -> Self {
        Self::InvalidBond {
            formula: formula.into(),
            a,
            b,
            detail: detail.into(),
        }
    }
}
