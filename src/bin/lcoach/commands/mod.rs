mod actions;
mod build;
mod list;
mod practice;
mod show;

use build::run_build;
use list::run_list;
use practice::run_practice;
use show::run_show;

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::List(args) => run_list(args, ctx),
        Command::Show(args) => run_show(args, ctx),
        Command::Build(args) => run_build(args, ctx),
        Command::Practice(args) => run_practice(args, ctx),
    }
}

/// Seed for runs without `--seed`.
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
