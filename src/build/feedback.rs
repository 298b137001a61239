//! Category-level feedback derived from a [`Verdict`].
//!
//! Hints name a kind of problem and nothing more: never which atom, and
//! never the expected value.

use std::fmt;

use super::validate::Verdict;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HintCategory {
    ElectronCount,
    BondingPattern,
    LonePairs,
    CentralAtom,
}

impl HintCategory {
    pub fn message(&self) -> &'static str {
        match self {
            HintCategory::ElectronCount => {
                "Electron count issue (you have electrons left, or you overspent)."
            }
            HintCategory::BondingPattern => {
                "Bonding pattern issue (check single vs double vs triple)."
            }
            HintCategory::LonePairs => {
                "Lone-pair issue (some atoms are missing or have too many lone pairs)."
            }
            HintCategory::CentralAtom => {
                "Central-atom issue (check which atom the others should bond to)."
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HintCategory::ElectronCount => "electron-count",
            HintCategory::BondingPattern => "bonding-pattern",
            HintCategory::LonePairs => "lone-pairs",
            HintCategory::CentralAtom => "central-atom",
        }
    }
}

impl fmt::Display for HintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    /// `hints` is empty when hints are disabled.
    Incorrect {
        hints: Vec<HintCategory>,
        tip: Option<String>,
    },
}

impl Feedback {
    pub fn is_correct(&self) -> bool {
        matches!(self, Feedback::Correct)
    }

    pub fn hints(&self) -> &[HintCategory] {
        match self {
            Feedback::Correct => &[],
            Feedback::Incorrect { hints, .. } => hints,
        }
    }

    /// Molecule-specific nudge, if one was attached.
    pub fn tip(&self) -> Option<&str> {
        match self {
            Feedback::Correct => None,
            Feedback::Incorrect { tip, .. } => tip.as_deref(),
        }
    }

    /// Attaches a molecule tip to feedback that already carries hints.
    ///
    /// Correct feedback and hint-free feedback are returned unchanged, so a
    /// tip never shows up when hints are turned off.
    pub fn with_tip(self, new_tip: Option<&str>) -> Self {
        match self {
            Feedback::Incorrect { hints, tip } if !hints.is_empty() => Feedback::Incorrect {
                tip: new_tip.map(str::to_string).or(tip),
                hints,
            },
            other => other,
        }
    }
}

/// Turns a verdict into learner-facing categories.
///
/// Categories always appear in the order electron count, bonding pattern,
/// lone pairs, central atom. A wrong central choice on an otherwise
/// correct structure is still [`Feedback::Correct`].
pub fn classify(verdict: &Verdict, hints_enabled: bool) -> Feedback {
    if verdict.is_correct() {
        return Feedback::Correct;
    }
    if !hints_enabled {
        return Feedback::Incorrect {
            hints: Vec::new(),
            tip: None,
        };
    }

    let mut hints = Vec::with_capacity(4);
    if !verdict.bank_empty() {
        hints.push(HintCategory::ElectronCount);
    }
    if !verdict.bond_mismatches.is_empty() {
        hints.push(HintCategory::BondingPattern);
    }
    if !verdict.lone_pair_mismatches.is_empty() {
        hints.push(HintCategory::LonePairs);
    }
    if !verdict.central_ok() {
        hints.push(HintCategory::CentralAtom);
    }
    Feedback::Incorrect { hints, tip: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::validate::{BondMismatch, CentralCheck, LonePairMismatch};
    use crate::model::molecule::AtomPair;
    use crate::model::types::BondOrder;

    fn verdict(bonds: bool, lone_pairs: bool, bank: u32, central: CentralCheck) -> Verdict {
        Verdict {
            bond_mismatches: if bonds {
                vec![BondMismatch {
                    pair: AtomPair::new(0, 1).unwrap(),
                    expected: Some(BondOrder::Double),
                    placed: Some(BondOrder::Single),
                }]
            } else {
                vec![]
            },
            lone_pair_mismatches: if lone_pairs {
                vec![LonePairMismatch {
                    atom: 0,
                    expected: 2,
                    placed: 1,
                }]
            } else {
                vec![]
            },
            bank_remaining: bank,
            central,
        }
    }

    #[test]
    fn correct_verdict() {
        let v = verdict(false, false, 0, CentralCheck::Correct);
        assert_eq!(classify(&v, true), Feedback::Correct);
        assert_eq!(classify(&v, false), Feedback::Correct);
    }

    #[test]
    fn categories_follow_fixed_order() {
        let v = verdict(true, true, 2, CentralCheck::Incorrect);
        assert_eq!(
            classify(&v, true).hints(),
            &[
                HintCategory::ElectronCount,
                HintCategory::BondingPattern,
                HintCategory::LonePairs,
                HintCategory::CentralAtom,
            ]
        );

        let v = verdict(false, true, 0, CentralCheck::NotChosen);
        assert_eq!(classify(&v, true).hints(), &[HintCategory::LonePairs]);
    }

    #[test]
    fn wrong_central_alone_is_still_correct() {
        let v = verdict(false, false, 0, CentralCheck::Incorrect);
        assert!(classify(&v, true).is_correct());
    }

    #[test]
    fn hints_disabled_gives_bare_incorrect() {
        let v = verdict(true, false, 4, CentralCheck::Correct);
        let fb = classify(&v, false);
        assert!(!fb.is_correct());
        assert!(fb.hints().is_empty());
        assert_eq!(fb.clone().with_tip(Some("nudge")).tip(), None);
    }

    #[test]
    fn tip_attaches_only_to_hinted_feedback() {
        let v = verdict(true, false, 0, CentralCheck::Correct);
        let fb = classify(&v, true).with_tip(Some("Carbon typically makes 4 single bonds."));
        assert_eq!(fb.tip(), Some("Carbon typically makes 4 single bonds."));
        assert_eq!(Feedback::Correct.with_tip(Some("x")).tip(), None);
    }

    #[test]
    fn messages_never_name_atoms() {
        for cat in [
            HintCategory::ElectronCount,
            HintCategory::BondingPattern,
            HintCategory::LonePairs,
            HintCategory::CentralAtom,
        ] {
            assert!(!cat.message().chars().any(|c| c.is_ascii_digit()));
        }
        assert_eq!(HintCategory::BondingPattern.to_string(), "bonding-pattern");
    }
}
