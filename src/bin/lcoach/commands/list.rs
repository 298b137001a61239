use std::io::{self, Write};

use anyhow::{Result, bail};

use lewis_coach::Catalog;

use crate::cli::ListArgs;
use crate::config::load_catalog;
use crate::display::{self, Context};

pub fn run_list(args: ListArgs, _ctx: Context) -> Result<()> {
    let custom = load_catalog(args.common.catalog.as_deref())?;
    let catalog = custom.as_ref().unwrap_or_else(|| Catalog::builtin());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    display::print_catalog(&mut out, catalog);

    if args.verify {
        let issues = catalog.check_consistency();
        display::print_consistency(&mut out, &issues);
        let _ = out.flush();
        if !issues.is_empty() {
            bail!(
                "{} of {} answer keys do not match their valence electron count",
                issues.len(),
                catalog.len()
            );
        }
    }
    let _ = writeln!(out);
    Ok(())
}
