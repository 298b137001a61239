use std::io::{self, Write};

use anyhow::Result;

use lewis_coach::Catalog;

use crate::cli::ShowArgs;
use crate::config::load_catalog;
use crate::display::{self, Context};

pub fn run_show(args: ShowArgs, _ctx: Context) -> Result<()> {
    let custom = load_catalog(args.common.catalog.as_deref())?;
    let catalog = custom.as_ref().unwrap_or_else(|| Catalog::builtin());
    let molecule = catalog.require(&args.formula)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    display::print_answer_key(&mut out, molecule);
    let _ = writeln!(out);
    Ok(())
}
