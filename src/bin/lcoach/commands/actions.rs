//! The line commands understood inside `build` and `practice`.

use std::io::Write;

use thiserror::Error;

use lewis_coach::{
    BondOrder, BuildError, BuildSession, CentralChoice, CheckReport, ElectronCount, Feedback,
    ParseBondOrderError, Phase,
};

use crate::util::text::count_noun;

pub const HELP: &str = "\
Commands (atoms are numbered from 0, as in `status`):
  count N              confirm the total valence electrons
  central I | none     lock the central atom
  bond A B [ORDER]     place a bond; ORDER is 1, 2, 3 (default 1)
  unbond A B           remove a bond
  lp ATOM SLOT         place a lone pair in a named slot (n, e, s, w, ...)
  unlp ATOM SLOT       remove a lone pair
  check                check the structure
  clear                remove everything and refill the bank
  answer               show the answer key (not counted as solved)
  status               show the drawing and the bank
  coach                suggest a next step
  next                 move on (practice only)
  help                 this list
  quit                 leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Count(u32),
    Central(CentralChoice),
    Bond { a: usize, b: usize, order: BondOrder },
    Unbond { a: usize, b: usize },
    LonePair { atom: usize, slot: String },
    RemoveLonePair { atom: usize, slot: String },
    Check,
    Clear,
    Answer,
    Status,
    Coach,
    Next,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("unknown command '{0}' (type `help` for the list)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a whole number")]
    NotANumber(String),

    #[error(transparent)]
    Order(#[from] ParseBondOrderError),
}

fn number<T: std::str::FromStr>(word: &str) -> Result<T, ActionError> {
    word.parse()
        .map_err(|_| ActionError::NotANumber(word.to_string()))
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Action>, ActionError> {
    let line = line.split('#').next().unwrap_or("").trim();
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((head, rest)) = words.split_first() else {
        return Ok(None);
    };

    let action = match (head.to_lowercase().as_str(), rest) {
        ("count" | "ve", [n]) => Action::Count(number(n)?),
        ("count" | "ve", _) => return Err(ActionError::Usage("count N")),

        ("central", [w]) if w.eq_ignore_ascii_case("none") => Action::Central(CentralChoice::None),
        ("central", [i]) => Action::Central(CentralChoice::Atom(number(i)?)),
        ("central", _) => return Err(ActionError::Usage("central I | none")),

        ("bond", [a, b]) => Action::Bond {
            a: number(a)?,
            b: number(b)?,
            order: BondOrder::Single,
        },
        ("bond", [a, b, order]) => Action::Bond {
            a: number(a)?,
            b: number(b)?,
            order: order.parse()?,
        },
        ("bond", _) => return Err(ActionError::Usage("bond A B [ORDER]")),

        ("unbond", [a, b]) => Action::Unbond {
            a: number(a)?,
            b: number(b)?,
        },
        ("unbond", _) => return Err(ActionError::Usage("unbond A B")),

        ("lp", [atom, slot]) => Action::LonePair {
            atom: number(atom)?,
            slot: slot.to_string(),
        },
        ("lp", _) => return Err(ActionError::Usage("lp ATOM SLOT")),

        ("unlp", [atom, slot]) => Action::RemoveLonePair {
            atom: number(atom)?,
            slot: slot.to_string(),
        },
        ("unlp", _) => return Err(ActionError::Usage("unlp ATOM SLOT")),

        ("check", []) => Action::Check,
        ("clear", []) => Action::Clear,
        ("answer" | "reveal", []) => Action::Answer,
        ("status" | "s", []) => Action::Status,
        ("coach" | "hint", []) => Action::Coach,
        ("next" | "skip", []) => Action::Next,
        ("help" | "?", []) => Action::Help,
        ("quit" | "exit" | "q", []) => Action::Quit,

        _ => return Err(ActionError::Unknown(line.to_string())),
    };
    Ok(Some(action))
}

/// Applies an action that edits the session and describes the result.
///
/// Returns `None` for actions the caller handles itself (checking,
/// display, navigation).
pub fn apply(
    session: &mut BuildSession<'_>,
    action: &Action,
) -> Option<Result<String, BuildError>> {
    let result = match action {
        Action::Count(n) => session.confirm_electron_count(*n).map(|outcome| {
            describe_count(session, *n, outcome)
        }),
        Action::Central(choice) => session
            .lock_central(*choice)
            .map(|_| format!("Central atom locked: {choice}. Now build the skeleton with bonds.")),
        Action::Bond { a, b, order } => session
            .place_bond(*a, *b, *order)
            .map(|left| format!("{order} bond {a}-{b} placed. {}", bank(left))),
        Action::Unbond { a, b } => session
            .remove_bond(*a, *b)
            .map(|left| format!("Bond {a}-{b} removed. {}", bank(left))),
        Action::LonePair { atom, slot } => session
            .place_lone_pair(*atom, slot.as_str())
            .map(|left| format!("Lone pair on atom {atom} ({slot}). {}", bank(left))),
        Action::RemoveLonePair { atom, slot } => session
            .remove_lone_pair(*atom, slot.as_str())
            .map(|left| format!("Lone pair {slot} on atom {atom} removed. {}", bank(left))),
        Action::Clear => session.clear().map(|_| {
            format!(
                "Cleared. {}",
                bank(session.bank_remaining().unwrap_or_default())
            )
        }),
        Action::Answer => session.show_answer().map(|_| {
            "Answer key placed. A revealed answer does not count as solved.".to_string()
        }),
        Action::Check
        | Action::Status
        | Action::Coach
        | Action::Next
        | Action::Help
        | Action::Quit => return None,
    };
    Some(result)
}

fn bank(left: u32) -> String {
    format!("{} left in the bank.", count_noun(left, "electron"))
}

fn describe_count(session: &BuildSession<'_>, guess: u32, outcome: ElectronCount) -> String {
    let formula = session.molecule().formula();
    match outcome {
        ElectronCount::Correct if session.phase() == Phase::CentralAtomLocked => format!(
            "Correct: {guess} valence electrons. {formula} is diatomic, so there is no central atom. Start building."
        ),
        ElectronCount::Correct => format!(
            "Correct: {guess} valence electrons. Now choose the central atom (options: {}).",
            session
                .central_options()
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        ElectronCount::TooLow | ElectronCount::TooHigh => format!(
            "Not quite ({}). Add the valence electrons of each atom in {formula}.",
            if outcome == ElectronCount::TooLow {
                "too low"
            } else {
                "too high"
            }
        ),
    }
}

pub fn print_report(out: &mut impl Write, formula: &str, report: &CheckReport) {
    match &report.feedback {
        Feedback::Correct => {
            let _ = writeln!(out, "✓ Correct! {formula} is solved.");
        }
        Feedback::Incorrect { hints, tip } => {
            let _ = writeln!(out, "✗ Not quite.");
            for hint in hints {
                let _ = writeln!(out, "  • {}", hint.message());
            }
            if let Some(tip) = tip {
                let _ = writeln!(out, "  Tip: {tip}");
            }
        }
    }
}
