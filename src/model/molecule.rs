use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use thiserror::Error;

use super::geometry::Geometry;
use super::types::{BondOrder, Element, LONE_PAIR_COST};

/// Unordered pair of atom indices.
///
/// Constructed only through [`AtomPair::new`], which stores the smaller
/// index first, so `(2, 0)` and `(0, 2)` produce the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomPair {
    lo: usize,
    hi: usize,
}

impl AtomPair {
    /// Returns `None` when both indices name the same atom.
    pub fn new(a: usize, b: usize) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { lo: a, hi: b }),
            std::cmp::Ordering::Greater => Some(Self { lo: b, hi: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    #[inline]
    pub fn lo(&self) -> usize {
        self.lo
    }

    #[inline]
    pub fn hi(&self) -> usize {
        self.hi
    }

    #[inline]
    pub fn contains(&self, atom: usize) -> bool {
        self.lo == atom || self.hi == atom
    }

    /// The partner of `atom` in this pair, if `atom` is one of its ends.
    pub fn other(&self, atom: usize) -> Option<usize> {
        if atom == self.lo {
            Some(self.hi)
        } else if atom == self.hi {
            Some(self.lo)
        } else {
            None
        }
    }
}

impl fmt::Display for AtomPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub pair: AtomPair,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(pair: AtomPair, order: BondOrder) -> Self {
        Self { pair, order }
    }
}

/// Which atoms count as a correct "central" choice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CentralAtom {
    /// Diatomic molecules have no central atom; the learner must say so.
    #[default]
    None,
    Candidates(Vec<usize>),
}

impl CentralAtom {
    pub fn is_none(&self) -> bool {
        matches!(self, CentralAtom::None)
    }

    pub fn accepts(&self, atom: usize) -> bool {
        match self {
            CentralAtom::None => false,
            CentralAtom::Candidates(c) => c.contains(&atom),
        }
    }

    /// First designated candidate, used when a choice is made on the
    /// learner's behalf.
    pub fn primary(&self) -> Option<usize> {
        match self {
            CentralAtom::None => None,
            CentralAtom::Candidates(c) => c.first().copied(),
        }
    }
}

/// A learner's central-atom selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CentralChoice {
    None,
    Atom(usize),
}

impl fmt::Display for CentralChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CentralChoice::None => write!(f, "none"),
            CentralChoice::Atom(i) => write!(f, "atom {i}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoleculeError {
    #[error("molecule '{0}' has no atoms")]
    Empty(String),

    #[error("invalid bond {a}-{b} in '{formula}': {detail}")]
    InvalidBond {
        formula: String,
        a: usize,
        b: usize,
        detail: &'static str,
    },

    #[error("duplicate bond {pair} in '{formula}'")]
    DuplicateBond { formula: String, pair: AtomPair },

    #[error("lone-pair list for '{formula}' has {got} entries, expected {expected}")]
    LonePairLength {
        formula: String,
        expected: usize,
        got: usize,
    },

    #[error("'{formula}' expects lone pairs on hydrogen atom {atom}")]
    HydrogenLonePair { formula: String, atom: usize },

    #[error("central candidate {atom} is out of range for '{formula}'")]
    InvalidCentral { formula: String, atom: usize },
}

/// Answer key for one practice molecule.
///
/// Atom order is fixed at definition time; indices into [`Molecule::atoms`]
/// identify atoms everywhere else in the crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    formula: String,
    name: Option<String>,
    atoms: Vec<Element>,
    expected_bonds: Vec<Bond>,
    expected_lone_pairs: BTreeMap<usize, u8>,
    central: CentralAtom,
    geometry: Option<Geometry>,
    tip: Option<String>,
}

impl Molecule {
    /// Builds and validates an answer key.
    ///
    /// `bonds` holds `(a, b, order)` triples; `lone_pairs` lists the
    /// expected count for every atom in atom order.
    pub fn new(
        formula: impl Into<String>,
        atoms: Vec<Element>,
        bonds: &[(usize, usize, BondOrder)],
        lone_pairs: &[u8],
        central: CentralAtom,
    ) -> Result<Self, MoleculeError> {
        let formula = formula.into();
        if atoms.is_empty() {
            return Err(MoleculeError::Empty(formula));
        }

        let mut seen = BTreeSet::new();
        let mut expected_bonds = Vec::with_capacity(bonds.len());
        for &(a, b, order) in bonds {
            if a >= atoms.len() || b >= atoms.len() {
                return Err(MoleculeError::InvalidBond {
                    formula,
                    a,
                    b,
                    detail: "atom index out of range",
                });
            }
            let Some(pair) = AtomPair::new(a, b) else {
                return Err(MoleculeError::InvalidBond {
                    formula,
                    a,
                    b,
                    detail: "an atom cannot bond to itself",
                });
            };
            if !seen.insert(pair) {
                return Err(MoleculeError::DuplicateBond { formula, pair });
            }
            expected_bonds.push(Bond::new(pair, order));
        }

        if lone_pairs.len() != atoms.len() {
            return Err(MoleculeError::LonePairLength {
                formula,
                expected: atoms.len(),
                got: lone_pairs.len(),
            });
        }
        if let Some(atom) = atoms
            .iter()
            .zip(lone_pairs)
            .position(|(el, &n)| el.is_hydrogen() && n > 0)
        {
            return Err(MoleculeError::HydrogenLonePair { formula, atom });
        }
        let expected_lone_pairs = lone_pairs.iter().copied().enumerate().collect();

        if let CentralAtom::Candidates(candidates) = &central {
            if let Some(&atom) = candidates.iter().find(|&&c| c >= atoms.len()) {
                return Err(MoleculeError::InvalidCentral { formula, atom });
            }
        }
        let central = match central {
            CentralAtom::Candidates(c) if c.is_empty() => CentralAtom::None,
            other => other,
        };

        Ok(Self {
            formula,
            name: None,
            atoms,
            expected_bonds,
            expected_lone_pairs,
            central,
            geometry: None,
            tip: None,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_tip(mut self, tip: impl Into<String>) -> Self {
        self.tip = Some(tip.into());
        self
    }

    #[inline]
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// Display name, falling back to the formula.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.formula)
    }

    #[inline]
    pub fn atoms(&self) -> &[Element] {
        &self.atoms
    }

    #[inline]
    pub fn atom(&self, idx: usize) -> Option<Element> {
        self.atoms.get(idx).copied()
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn expected_bonds(&self) -> &[Bond] {
        &self.expected_bonds
    }

    pub fn expected_bond(&self, pair: AtomPair) -> Option<BondOrder> {
        self.expected_bonds
            .iter()
            .find(|b| b.pair == pair)
            .map(|b| b.order)
    }

    #[inline]
    pub fn expected_lone_pairs(&self) -> &BTreeMap<usize, u8> {
        &self.expected_lone_pairs
    }

    #[inline]
    pub fn central(&self) -> &CentralAtom {
        &self.central
    }

    #[inline]
    pub fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    #[inline]
    pub fn tip(&self) -> Option<&str> {
        self.tip.as_deref()
    }

    #[inline]
    pub fn is_diatomic(&self) -> bool {
        self.atoms.len() == 2
    }

    /// Size of the electron bank for this molecule.
    pub fn total_valence_electrons(&self) -> u32 {
        self.atoms.iter().map(Element::valence_electrons).sum()
    }

    /// Electrons the answer key assigns to bonds and lone pairs.
    ///
    /// Equals [`total_valence_electrons`](Self::total_valence_electrons)
    /// for every well-formed practice entry.
    pub fn answer_key_electrons(&self) -> u32 {
        let bonds: u32 = self
            .expected_bonds
            .iter()
            .map(|b| b.order.electron_cost())
            .sum();
        let lone_pairs: u32 = self
            .expected_lone_pairs
            .values()
            .map(|&n| u32::from(n) * LONE_PAIR_COST)
            .sum();
        bonds + lone_pairs
    }
}
