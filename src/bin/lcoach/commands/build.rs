use std::io::{self, Write};

use anyhow::{Result, anyhow};
use log::info;

use lewis_coach::{BuildSession, Catalog, Picker};

use super::actions::{self, Action, HELP};
use super::clock_seed;
use crate::cli::BuildArgs;
use crate::config::{build_coach_config, load_catalog};
use crate::display::{self, Context};
use crate::io::Console;

pub fn run_build(args: BuildArgs, ctx: Context) -> Result<()> {
    let config = build_coach_config(&args.coach)?;
    let custom = load_catalog(args.common.catalog.as_deref())?;
    let catalog = custom.as_ref().unwrap_or_else(|| Catalog::builtin());

    let molecule = match &args.formula {
        Some(formula) => catalog.require(formula)?,
        None => {
            let seed = args.seed.unwrap_or_else(clock_seed);
            info!("picking a molecule with seed {seed}");
            catalog
                .pick(&mut Picker::from_seed_u64(seed))
                .ok_or_else(|| anyhow!("The catalog has no molecules to build"))?
        }
    };

    let mut session = BuildSession::new(molecule, config);
    let mut console = Console::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let _ = writeln!(out, "Build {} ({}).", molecule.formula(), molecule.name());
    if ctx.interactive {
        let _ = writeln!(out, "Type `help` for commands.");
    }
    let _ = writeln!(out, "{}", session.coach().next_prompt());

    let prompt = format!("{}> ", molecule.formula());
    while let Some(line) = console.read_line(&prompt)? {
        let action = match actions::parse_line(line) {
            Ok(Some(action)) => action,
            Ok(None) => continue,
            Err(e) => {
                let _ = writeln!(out, "✗ {e}");
                continue;
            }
        };

        match action {
            Action::Quit => break,
            Action::Help => {
                let _ = writeln!(out, "{HELP}");
            }
            Action::Status => display::print_status(&mut out, &session),
            Action::Coach => {
                let _ = writeln!(out, "{}", session.coach().next_prompt());
            }
            Action::Next => {
                let _ = writeln!(
                    out,
                    "Build works on one molecule; use `lcoach practice` for a set."
                );
            }
            Action::Check => match session.check() {
                Ok(report) => {
                    actions::print_report(&mut out, molecule.formula(), &report);
                    if session.is_solved() && !session.answer_revealed() {
                        let _ = writeln!(out, "Type `quit` to leave.");
                    }
                }
                Err(e) => {
                    let _ = writeln!(out, "✗ {e}");
                }
            },
            edit => match actions::apply(&mut session, &edit) {
                Some(Ok(msg)) => {
                    let _ = writeln!(out, "{msg}");
                }
                Some(Err(e)) => {
                    let _ = writeln!(out, "✗ {e}");
                }
                None => {}
            },
        }
        let _ = out.flush();
    }

    Ok(())
}
