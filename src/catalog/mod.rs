//! The molecule catalog: answer keys for every practice molecule.
//!
//! The built-in catalog is compiled into the binary from
//! `resources/molecules.toml` and parsed once on first use. Custom catalogs
//! in the same format load through [`Catalog::from_toml`].
//!
//! # Format
//!
//! ```toml
//! [[molecule]]
//! formula = "H2O"
//! name = "Water"                  # optional
//! atoms = ["O", "H", "H"]
//! bonds = [[0, 1, 1], [0, 2, 1]]  # [a, b, order]
//! lone_pairs = [2, 0, 0]          # per atom, in atom order
//! central = [0]                   # omit for diatomics
//! geometry = "bent"               # optional
//! tip = "Oxygen often has 2 bonds and 2 lone pairs."  # optional
//! ```

mod error;

pub use error::Error;

use std::collections::HashMap;
use std::sync::OnceLock;

use log::debug;
use serde::Deserialize;

use crate::model::geometry::Geometry;
use crate::model::molecule::{CentralAtom, Molecule};
use crate::model::types::{BondOrder, Element};
use crate::rng::Picker;

const BUILTIN_CATALOG_TOML: &str = include_str!("../../resources/molecules.toml");

static BUILTIN_CATALOG: OnceLock<Catalog> = OnceLock::new();

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "molecule")]
    molecules: Vec<MoleculeEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MoleculeEntry {
    formula: String,
    name: Option<String>,
    atoms: Vec<String>,
    #[serde(default)]
    bonds: Vec<[u32; 3]>,
    lone_pairs: Vec<u8>,
    #[serde(default)]
    central: Vec<usize>,
    geometry: Option<Geometry>,
    tip: Option<String>,
}

impl MoleculeEntry {
    fn into_molecule(self) -> Result<Molecule, Error> {
        let formula = self.formula;

        let atoms = self
            .atoms
            .iter()
            .map(|sym| {
                sym.parse::<Element>().map_err(|_| Error::UnknownElement {
                    formula: formula.clone(),
                    symbol: sym.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let bonds = self
            .bonds
            .iter()
            .map(|&[a, b, order]| {
                let (a, b) = (a as usize, b as usize);
                u8::try_from(order)
                    .ok()
                    .and_then(|o| BondOrder::try_from(o).ok())
                    .map(|order| (a, b, order))
                    .ok_or_else(|| {
                        Error::invalid_bond(
                            formula.as_str(),
                            a,
                            b,
                            format!("bond order must be 1, 2 or 3, found {order}"),
                        )
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let central = if self.central.is_empty() {
            CentralAtom::None
        } else {
            CentralAtom::Candidates(self.central)
        };

        let mut molecule = Molecule::new(formula, atoms, &bonds, &self.lone_pairs, central)?;
        if let Some(name) = self.name {
            molecule = molecule.with_name(name);
        }
        if let Some(geometry) = self.geometry {
            molecule = molecule.with_geometry(geometry);
        }
        if let Some(tip) = self.tip {
            molecule = molecule.with_tip(tip);
        }
        Ok(molecule)
    }
}

/// An entry whose answer key does not spend exactly its valence electrons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inconsistency {
    pub formula: String,
    pub valence_electrons: u32,
    pub answer_key_electrons: u32,
}

/// Ordered collection of molecules, unique by formula.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    molecules: Vec<Molecule>,
    by_formula: HashMap<String, usize>,
}

impl Catalog {
    /// Parses and validates a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed TOML, and one of the
    /// validation variants for an entry that cannot form a well-defined
    /// answer key (unknown element, bad bond, wrong lone-pair list, and
    /// so on). Duplicate formulas are rejected.
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let file: CatalogFile = toml::from_str(text)?;
        let mut catalog = Catalog::default();
        for entry in file.molecules {
            catalog.insert(entry.into_molecule()?)?;
        }
        debug!("loaded molecule catalog with {} entries", catalog.len());
        Ok(catalog)
    }

    /// The compiled-in catalog.
    pub fn builtin() -> &'static Catalog {
        BUILTIN_CATALOG.get_or_init(|| {
            Catalog::from_toml(BUILTIN_CATALOG_TOML)
                .expect("Failed to parse embedded molecule catalog. This is a library bug.")
        })
    }

    /// Appends a molecule, refusing a formula that is already present.
    pub fn insert(&mut self, molecule: Molecule) -> Result<(), Error> {
        if self.by_formula.contains_key(molecule.formula()) {
            return Err(Error::DuplicateFormula(molecule.formula().to_string()));
        }
        self.by_formula
            .insert(molecule.formula().to_string(), self.molecules.len());
        self.molecules.push(molecule);
        Ok(())
    }

    pub fn get(&self, formula: &str) -> Option<&Molecule> {
        self.by_formula.get(formula).map(|&i| &self.molecules[i])
    }

    /// Like [`get`](Self::get), but reports a missing formula as an error.
    pub fn require(&self, formula: &str) -> Result<&Molecule, Error> {
        self.get(formula)
            .ok_or_else(|| Error::UnknownFormula(formula.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Molecule> {
        self.molecules.iter()
    }

    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }

    /// A uniformly random molecule, or `None` for an empty catalog.
    pub fn pick(&self, picker: &mut Picker) -> Option<&Molecule> {
        picker
            .choose_index(self.molecules.len())
            .map(|i| &self.molecules[i])
    }

    /// Entries whose answer key does not exhaust the valence electrons.
    ///
    /// Every practice molecule is expected to satisfy
    /// `valence = 2 * Σ bond orders + 2 * Σ lone pairs`. This is a property
    /// of the data and is checked in tests, not while building.
    pub fn check_consistency(&self) -> Vec<Inconsistency> {
        self.molecules
            .iter()
            .filter_map(|m| {
                let valence = m.total_valence_electrons();
                let key = m.answer_key_electrons();
                (valence != key).then(|| Inconsistency {
                    formula: m.formula().to_string(),
                    valence_electrons: valence,
                    answer_key_electrons: key,
                })
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Molecule;
    type IntoIter = std::slice::Iter<'a, Molecule>;

    fn into_iter(self) -> Self::IntoIter {
        self.molecules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::molecule::AtomPair;
    use crate::model::types::LONE_PAIR_COST;

    #[test]
    fn builtin_catalog_loads_all_entries() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 17);
        for formula in [
            "Br2", "F2", "H2", "N2", "O2", "HF", "CO2", "HCN", "PF3", "NH3", "H2O", "CF4", "CBr4",
            "CH4", "CH2O", "BF3", "SO2",
        ] {
            assert!(catalog.get(formula).is_some(), "missing {formula}");
        }
    }

    #[test]
    fn every_builtin_entry_exhausts_its_valence_electrons() {
        let catalog = Catalog::builtin();
        assert!(catalog.check_consistency().is_empty());
        for m in catalog {
            let bonds: u32 = m
                .expected_bonds()
                .iter()
                .map(|b| u32::from(b.order.value()))
                .sum();
            let lone_pairs: u32 = m.expected_lone_pairs().values().map(|&n| u32::from(n)).sum();
            assert_eq!(
                m.total_valence_electrons(),
                2 * bonds + LONE_PAIR_COST * lone_pairs,
                "{}",
                m.formula()
            );
        }
    }

    #[test]
    fn diatomics_have_no_central_and_others_do() {
        for m in Catalog::builtin() {
            if m.is_diatomic() {
                assert!(m.central().is_none(), "{}", m.formula());
            } else {
                assert!(m.central().primary().is_some(), "{}", m.formula());
            }
        }
    }

    #[test]
    fn builtin_water_and_carbon_dioxide() {
        let catalog = Catalog::builtin();
        let water = catalog.get("H2O").unwrap();
        assert_eq!(water.atoms(), &[Element::O, Element::H, Element::H]);
        assert_eq!(water.total_valence_electrons(), 8);
        assert_eq!(water.name(), "Water");
        assert_eq!(water.geometry(), Some(Geometry::Bent));

        let co2 = catalog.get("CO2").unwrap();
        assert_eq!(co2.total_valence_electrons(), 16);
        assert_eq!(
            co2.expected_bond(AtomPair::new(1, 0).unwrap()),
            Some(BondOrder::Double)
        );
        assert!(co2.central().accepts(1));
    }

    #[test]
    fn require_reports_unknown_formula() {
        let err = Catalog::builtin().require("XeF4").unwrap_err();
        assert!(matches!(err, Error::UnknownFormula(ref f) if f == "XeF4"));
    }

    #[test]
    fn pick_is_deterministic_per_seed() {
        let catalog = Catalog::builtin();
        let a = catalog.pick(&mut Picker::from_seed_u64(11)).unwrap();
        let b = catalog.pick(&mut Picker::from_seed_u64(11)).unwrap();
        assert_eq!(a.formula(), b.formula());
        assert!(Catalog::default().pick(&mut Picker::from_seed_u64(0)).is_none());
    }

    #[test]
    fn custom_catalog_round_trip() {
        let text = r#"
            [[molecule]]
            formula = "HCl"
            atoms = ["H", "Cl"]
            bonds = [[1, 0, 1]]
            lone_pairs = [0, 3]
        "#;
        let catalog = Catalog::from_toml(text).unwrap();
        let hcl = catalog.require("HCl").unwrap();
        assert_eq!(hcl.total_valence_electrons(), 8);
        assert!(hcl.central().is_none());
        assert_eq!(hcl.geometry(), None);
        assert!(catalog.check_consistency().is_empty());
    }

    #[test]
    fn rejects_unknown_element() {
        let text = r#"
            [[molecule]]
            formula = "XeF2"
            atoms = ["Xe", "F", "F"]
            bonds = [[0, 1, 1], [0, 2, 1]]
            lone_pairs = [3, 3, 3]
        "#;
        let err = Catalog::from_toml(text).unwrap_err();
        assert!(matches!(err, Error::UnknownElement { ref symbol, .. } if symbol == "Xe"));
    }

    #[test]
    fn rejects_bad_bond_order_and_self_bond() {
        let quad = r#"
            [[molecule]]
            formula = "C2"
            atoms = ["C", "C"]
            bonds = [[0, 1, 4]]
            lone_pairs = [0, 0]
        "#;
        assert!(matches!(
            Catalog::from_toml(quad).unwrap_err(),
            Error::InvalidBond { a: 0, b: 1, .. }
        ));

        let selfish = r#"
            [[molecule]]
            formula = "C2"
            atoms = ["C", "C"]
            bonds = [[1, 1, 1]]
            lone_pairs = [0, 0]
        "#;
        assert!(matches!(
            Catalog::from_toml(selfish).unwrap_err(),
            Error::InvalidBond { a: 1, b: 1, .. }
        ));
    }

    #[test]
    fn rejects_duplicate_bond_and_formula() {
        let dup_bond = r#"
            [[molecule]]
            formula = "O2"
            atoms = ["O", "O"]
            bonds = [[0, 1, 2], [1, 0, 2]]
            lone_pairs = [2, 2]
        "#;
        assert!(matches!(
            Catalog::from_toml(dup_bond).unwrap_err(),
            Error::DuplicateBond { a: 0, b: 1, .. }
        ));

        let dup_formula = r#"
            [[molecule]]
            formula = "H2"
            atoms = ["H", "H"]
            bonds = [[0, 1, 1]]
            lone_pairs = [0, 0]

            [[molecule]]
            formula = "H2"
            atoms = ["H", "H"]
            bonds = [[0, 1, 1]]
            lone_pairs = [0, 0]
        "#;
        assert!(matches!(
            Catalog::from_toml(dup_formula).unwrap_err(),
            Error::DuplicateFormula(ref f) if f == "H2"
        ));
    }

    #[test]
    fn rejects_lone_pair_problems_and_bad_central() {
        let short = r#"
            [[molecule]]
            formula = "HF"
            atoms = ["H", "F"]
            bonds = [[0, 1, 1]]
            lone_pairs = [0]
        "#;
        assert!(matches!(
            Catalog::from_toml(short).unwrap_err(),
            Error::InvalidLonePairs { .. }
        ));

        let central = r#"
            [[molecule]]
            formula = "H2O"
            atoms = ["O", "H", "H"]
            bonds = [[0, 1, 1], [0, 2, 1]]
            lone_pairs = [2, 0, 0]
            central = [3]
        "#;
        assert!(matches!(
            Catalog::from_toml(central).unwrap_err(),
            Error::InvalidCentral { atom: 3, .. }
        ));
    }

    #[test]
    fn rejects_empty_molecule_and_malformed_toml() {
        let empty = r#"
            [[molecule]]
            formula = "nothing"
            atoms = []
            lone_pairs = []
        "#;
        assert!(matches!(
            Catalog::from_toml(empty).unwrap_err(),
            Error::EmptyMolecule(_)
        ));
        assert!(matches!(
            Catalog::from_toml("[[molecule]]\nformula = 3").unwrap_err(),
            Error::Parse(_)
        ));
    }

    #[test]
    fn consistency_check_flags_unbalanced_entries() {
        let text = r#"
            [[molecule]]
            formula = "OH"
            atoms = ["O", "H"]
            bonds = [[0, 1, 1]]
            lone_pairs = [2, 0]
        "#;
        let catalog = Catalog::from_toml(text).unwrap();
        let issues = catalog.check_consistency();
        assert_eq!(
            issues,
            vec![Inconsistency {
                formula: "OH".to_string(),
                valence_electrons: 7,
                answer_key_electrons: 6,
            }]
        );
    }
}
