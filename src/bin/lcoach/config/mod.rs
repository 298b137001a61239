use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};

use lewis_coach::{Catalog, CoachConfig};

use crate::cli::CoachOptions;
use crate::io::read_text;

/// Coach settings from the optional TOML file, then the flags on top.
pub fn build_coach_config(opts: &CoachOptions) -> Result<CoachConfig> {
    let mut config = match &opts.config {
        Some(path) => {
            let text = read_text(path)?;
            CoachConfig::from_toml(&text)
                .with_context(|| format!("Invalid coach settings in {}", path.display()))?
        }
        None => CoachConfig::default(),
    };

    if opts.no_hints {
        config.hints = false;
    }
    if opts.no_tips {
        config.molecule_tips = false;
    }
    if opts.no_auto_lock {
        config.auto_lock_diatomic = false;
    }
    if let Some(policy) = opts.central_policy {
        config.central_policy = policy.into();
    }

    debug!("coach config: {config:?}");
    Ok(config)
}

/// Loads a custom catalog, or `None` to use the built-in one.
///
/// Answer keys that do not spend exactly the molecule's valence electrons
/// are reported as warnings; they still load.
pub fn load_catalog(path: Option<&Path>) -> Result<Option<Catalog>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let text = read_text(path)?;
    let catalog = Catalog::from_toml(&text)
        .with_context(|| format!("Invalid molecule catalog: {}", path.display()))?;

    for issue in catalog.check_consistency() {
        warn!(
            "{}: answer key uses {} electrons but the molecule has {} valence electrons",
            issue.formula, issue.answer_key_electrons, issue.valence_electrons
        );
    }
    debug!("loaded {} molecules from {}", catalog.len(), path.display());
    Ok(Some(catalog))
}
