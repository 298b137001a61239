use serde::Deserialize;
use std::fmt;

/// Layout hint for renderers.
///
/// Validation never reads this; it only tells a front-end how the atoms
/// are usually arranged on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Geometry {
    Diatomic,
    Linear,
    Bent,
    TrigonalPlanar,
    TrigonalPyramidal,
    Tetrahedral,
}

impl Geometry {
    pub fn label(&self) -> &'static str {
        match self {
            Geometry::Diatomic => "diatomic",
            Geometry::Linear => "linear",
            Geometry::Bent => "bent",
            Geometry::TrigonalPlanar => "trigonal planar",
            Geometry::TrigonalPyramidal => "trigonal pyramidal",
            Geometry::Tetrahedral => "tetrahedral",
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        geometry: Geometry,
    }

    #[test]
    fn deserializes_kebab_case_names() {
        let w: Wrapper = toml::from_str(r#"geometry = "trigonal-pyramidal""#).unwrap();
        assert_eq!(w.geometry, Geometry::TrigonalPyramidal);
        let w: Wrapper = toml::from_str(r#"geometry = "diatomic""#).unwrap();
        assert_eq!(w.geometry, Geometry::Diatomic);
    }

    #[test]
    fn rejects_unknown_name() {
        assert!(toml::from_str::<Wrapper>(r#"geometry = "octahedral""#).is_err());
    }

    #[test]
    fn display_uses_plain_words() {
        assert_eq!(Geometry::TrigonalPlanar.to_string(), "trigonal planar");
    }
}
