use std::io::{self, Write};
use std::time::Instant;

use anyhow::Result;
use log::info;

use lewis_coach::{Catalog, Molecule, PracticeOptions, PracticeSet};

use super::actions::{self, Action, HELP};
use super::clock_seed;
use crate::cli::PracticeArgs;
use crate::config::{build_coach_config, load_catalog};
use crate::display::{self, Context};
use crate::io::Console;

fn announce(out: &mut impl Write, set: &PracticeSet<'_>, molecule: &Molecule) {
    let (index, total) = set.position();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "[{}/{}] {} ({}): {} valence electrons.",
        index + 1,
        total,
        molecule.formula(),
        molecule.name(),
        molecule.total_valence_electrons()
    );
    let _ = writeln!(out, "{}", set.session().coach().next_prompt());
}

pub fn run_practice(args: PracticeArgs, ctx: Context) -> Result<()> {
    let config = build_coach_config(&args.coach)?;
    let custom = load_catalog(args.common.catalog.as_deref())?;
    let catalog = custom.as_ref().unwrap_or_else(|| Catalog::builtin());

    let seed = args.seed.unwrap_or_else(clock_seed);
    info!("practice set of {} with seed {seed}", args.size);
    let mut set = PracticeSet::new(
        catalog,
        PracticeOptions {
            size: args.size,
            seed,
            config,
        },
    )?;

    let mut console = Console::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if ctx.interactive {
        let _ = writeln!(
            out,
            "Practice set: {} molecules (seed {seed}). Type `help` for commands.",
            set.molecules().len()
        );
    }
    announce(&mut out, &set, set.current());
    let mut started = Instant::now();

    loop {
        let prompt = format!("{}> ", set.current().formula());
        let Some(line) = console.read_line(&prompt)? else {
            break;
        };
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
            Action::Status => display::print_status(&mut out, set.session()),
            Action::Coach => {
                let _ = writeln!(out, "{}", set.session().coach().next_prompt());
            }
            Action::Next => match set.advance(Some(started.elapsed())) {
                Some(molecule) => {
                    announce(&mut out, &set, molecule);
                    started = Instant::now();
                }
                None => break,
            },
            Action::Check => match set.check(Some(started.elapsed())) {
                Ok(report) => {
                    actions::print_report(&mut out, set.current().formula(), &report);
                    if report.feedback.is_correct() {
                        let _ = writeln!(out, "Type `next` to continue.");
                    }
                }
                Err(e) => {
                    let _ = writeln!(out, "✗ {e}");
                }
            },
            edit => match actions::apply(set.session_mut(), &edit) {
                Some(Ok(msg)) => {
                    let _ = writeln!(out, "{msg}");
                }
                Some(Err(e)) => {
                    set.record_refusal(&e);
                    let _ = writeln!(out, "✗ {e}");
                }
                None => {}
            },
        }
        let _ = out.flush();
    }

    display::print_practice_summary(&mut out, &set.summary(), set.molecules(), set.records());
    let _ = writeln!(out);
    Ok(())
}
