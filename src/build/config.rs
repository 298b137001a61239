//! Behaviour switches for build sessions.

use serde::Deserialize;

/// How a wrong central-atom choice is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CentralPolicy {
    /// Record the choice and report it later as a central-atom hint.
    #[default]
    Lenient,
    /// Refuse the lock until a correct atom is picked.
    Strict,
}

/// Configuration for a [`BuildSession`](super::BuildSession).
///
/// # Examples
///
/// ```
/// use lewis_coach::{CentralPolicy, CoachConfig};
///
/// let config = CoachConfig::from_toml(r#"
///     hints = false
///     central_policy = "strict"
/// "#)?;
/// assert!(!config.hints);
/// assert!(config.molecule_tips);
/// assert_eq!(config.central_policy, CentralPolicy::Strict);
/// # Ok::<(), toml::de::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoachConfig {
    /// Report hint categories on an incorrect check. When off, a check
    /// only says correct or incorrect.
    pub hints: bool,

    /// Add the molecule's own nudge to hinted feedback.
    pub molecule_tips: bool,

    /// Lock the "no central atom" choice as soon as the electron count of
    /// a diatomic molecule is confirmed.
    pub auto_lock_diatomic: bool,

    pub central_policy: CentralPolicy,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            hints: true,
            molecule_tips: true,
            auto_lock_diatomic: true,
            central_policy: CentralPolicy::Lenient,
        }
    }
}

impl CoachConfig {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_gives_defaults() {
        assert_eq!(CoachConfig::from_toml("").unwrap(), CoachConfig::default());
    }

    #[test]
    fn partial_override() {
        let c = CoachConfig::from_toml("auto_lock_diatomic = false").unwrap();
        assert!(!c.auto_lock_diatomic);
        assert!(c.hints);
        assert_eq!(c.central_policy, CentralPolicy::Lenient);
    }

    #[test]
    fn rejects_unknown_keys_and_policies() {
        assert!(CoachConfig::from_toml("hint = true").is_err());
        assert!(CoachConfig::from_toml(r#"central_policy = "maybe""#).is_err());
    }
}
