use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

impl ParseElementError {
    pub fn symbol(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bond order: '{0}'")]
pub struct ParseBondOrderError(String);

/// Electrons consumed by one lone pair.
pub const LONE_PAIR_COST: u32 = 2;

/// Main-group elements that appear in the practice molecules.
///
/// The set is closed: symbols outside it fail to parse instead of
/// contributing zero valence electrons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Element {
    H = 1,
    B = 5,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    P = 15,
    S = 16,
    Cl = 17,
    Br = 35,
    I = 53,
}

impl Element {
    pub const ALL: [Element; 11] = [
        Element::H,
        Element::B,
        Element::C,
        Element::N,
        Element::O,
        Element::F,
        Element::P,
        Element::S,
        Element::Cl,
        Element::Br,
        Element::I,
    ];

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    /// Outer-shell electrons contributed by one atom of this element.
    pub fn valence_electrons(&self) -> u32 {
        match self {
            Element::H => 1,
            Element::B => 3,
            Element::C => 4,
            Element::N | Element::P => 5,
            Element::O | Element::S => 6,
            Element::F | Element::Cl | Element::Br | Element::I => 7,
        }
    }

    /// Electron count an atom of this element aims for: the duet for
    /// hydrogen, the octet for everything else.
    pub fn octet_target(&self) -> u32 {
        match self {
            Element::H => 2,
            _ => 8,
        }
    }

    #[inline]
    pub fn is_hydrogen(&self) -> bool {
        matches!(self, Element::H)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::Br => "Br",
            Element::I => "I",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Element::H => "Hydrogen",
            Element::B => "Boron",
            Element::C => "Carbon",
            Element::N => "Nitrogen",
            Element::O => "Oxygen",
            Element::F => "Fluorine",
            Element::P => "Phosphorus",
            Element::S => "Sulfur",
            Element::Cl => "Chlorine",
            Element::Br => "Bromine",
            Element::I => "Iodine",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::ALL
            .iter()
            .copied()
            .find(|e| e.symbol() == s)
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

/// Sums the valence electrons of raw element symbols.
///
/// Unknown symbols are reported, never counted as zero.
pub fn total_valence<S: AsRef<str>>(symbols: &[S]) -> Result<u32, ParseElementError> {
    symbols.iter().try_fold(0u32, |sum, sym| {
        let element: Element = sym.as_ref().parse()?;
        Ok(sum + element.valence_electrons())
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
}

impl BondOrder {
    pub const ALL: [BondOrder; 3] = [BondOrder::Single, BondOrder::Double, BondOrder::Triple];

    /// Number of shared electron pairs.
    pub fn value(&self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }

    /// Electrons drawn from the bank when this bond is placed.
    pub fn electron_cost(&self) -> u32 {
        2 * u32::from(self.value())
    }

    /// The next stronger order, if any.
    pub fn upgraded(&self) -> Option<BondOrder> {
        match self {
            BondOrder::Single => Some(BondOrder::Double),
            BondOrder::Double => Some(BondOrder::Triple),
            BondOrder::Triple => None,
        }
    }

    /// Line-notation glyph used in text diagrams.
    pub fn glyph(&self) -> &'static str {
        match self {
            BondOrder::Single => "—",
            BondOrder::Double => "=",
            BondOrder::Triple => "≡",
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BondOrder::Single => write!(f, "Single"),
            BondOrder::Double => write!(f, "Double"),
            BondOrder::Triple => write!(f, "Triple"),
        }
    }
}

impl TryFrom<u8> for BondOrder {
    type Error = ParseBondOrderError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(BondOrder::Single),
            2 => Ok(BondOrder::Double),
            3 => Ok(BondOrder::Triple),
            other => Err(ParseBondOrderError(other.to_string())),
        }
    }
}

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" | "1" | "-" => Ok(BondOrder::Single),
            "double" | "2" | "=" => Ok(BondOrder::Double),
            "triple" | "3" | "#" => Ok(BondOrder::Triple),
            _ => Err(ParseBondOrderError(s.to_string())),
        }
    }
}
