use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self {
            hints: Vec::new(),
            has_typed_hints: false,
        };

        collector.collect_catalog_hints(err);
        collector.collect_config_hints(err);
        collector.collect_practice_hints(err);
        collector.collect_io_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        (!collector.hints.is_empty()).then_some(collector.hints)
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_catalog_hints(&mut self, err: &Error) {
        use lewis_coach::{CatalogError, Element};

        let Some(catalog_err) = err.downcast_ref::<CatalogError>() else {
            return;
        };

        self.mark_typed();

        match catalog_err {
            CatalogError::Parse(_) => {
                self.add("The catalog is not valid TOML or has an unexpected layout");
                self.add("Each entry is a [[molecule]] table with formula, atoms, bonds and lone_pairs");
            }

            CatalogError::UnknownElement { symbol, .. } => {
                let supported: Vec<&str> = Element::ALL.iter().map(|e| e.symbol()).collect();
                self.add(format!("'{}' is not a supported element symbol", symbol));
                self.add(format!("Supported: {}", supported.join(", ")));
            }

            CatalogError::EmptyMolecule(_) => {
                self.add("Every molecule needs at least one atom in its atoms list");
            }

            CatalogError::InvalidBond { .. } => {
                self.add("Bonds are [a, b, order] with 0-based atom indices");
                self.add("The two indices must differ and order must be 1, 2 or 3");
            }

            CatalogError::DuplicateBond { .. } => {
                self.add("Each pair of atoms may appear in at most one bond");
                self.add("[0, 1, 2] and [1, 0, 2] describe the same bond");
            }

            CatalogError::InvalidLonePairs { .. } => {
                self.add("lone_pairs needs one count per atom, in atom order");
                self.add("Hydrogen atoms always have 0 lone pairs");
            }

            CatalogError::InvalidCentral { .. } => {
                self.add("central lists 0-based atom indices of the molecule");
                self.add("Leave central out (or empty) for diatomic molecules");
            }

            CatalogError::DuplicateFormula(formula) => {
                self.add(format!("Rename or remove one of the '{}' entries", formula));
            }

            CatalogError::UnknownFormula(_) => {
                self.add("Formulas are case-sensitive (CO2, not co2)");
                self.add("Run `lcoach list` to see the available molecules");
            }
        }
    }

    fn collect_config_hints(&mut self, err: &Error) {
        if err.downcast_ref::<lewis_coach::CatalogError>().is_some() {
            return;
        }
        let Some(toml_err) = err.downcast_ref::<toml::de::Error>() else {
            return;
        };

        self.mark_typed();

        let msg = toml_err.message().to_lowercase();
        if msg.contains("unknown field") {
            self.add("Known settings: hints, molecule_tips, auto_lock_diatomic, central_policy");
        } else if msg.contains("unknown variant") {
            self.add("central_policy is either \"lenient\" or \"strict\"");
        } else {
            self.add("The settings file is not valid TOML");
            self.add("Check for missing quotes or non-boolean values");
        }
    }

    fn collect_practice_hints(&mut self, err: &Error) {
        use lewis_coach::PracticeError;

        let Some(practice_err) = err.downcast_ref::<PracticeError>() else {
            return;
        };

        self.mark_typed();

        match practice_err {
            PracticeError::EmptySet {
                available,
                requested,
            } => {
                if *available == 0 {
                    self.add("The catalog has no molecules");
                } else if *requested == 0 {
                    self.add("Use --size 1 or more");
                }
            }
        }
    }

    fn collect_io_hints(&mut self, err: &Error) {
        use std::io::ErrorKind;

        let Some(io_err) = err.downcast_ref::<std::io::Error>() else {
            return;
        };

        self.mark_typed();

        match io_err.kind() {
            ErrorKind::NotFound => {
                self.add("File not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied reading the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("The file is not valid UTF-8 text");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check the file path and permissions");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("stdin") {
            self.add("Commands are read one per line from stdin");
            self.add("Type `help` in a session for the command list");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = err.to_string();

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}
