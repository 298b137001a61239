use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use lewis_coach::CentralPolicy;

#[derive(Parser)]
#[command(
    name = "lcoach",
    about = "Practice drawing Lewis (electron-dot) structures",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the molecules in the catalog
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Print the answer key of one molecule
    Show(ShowArgs),

    /// Build one molecule step by step
    #[command(visible_alias = "b")]
    Build(BuildArgs),

    /// Work through a seeded set of molecules and get a summary
    #[command(visible_alias = "p")]
    Practice(PracticeArgs),
}

impl Command {
    pub fn common(&self) -> &CommonOptions {
        match self {
            Command::List(args) => &args.common,
            Command::Show(args) => &args.common,
            Command::Build(args) => &args.common,
            Command::Practice(args) => &args.common,
        }
    }
}

/// Options shared by all commands.
#[derive(Args)]
pub struct CommonOptions {
    /// Molecule catalog in TOML (built-in catalog if omitted)
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Suppress the banner and decorative output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Coaching behaviour shared by build and practice.
#[derive(Args)]
#[command(next_help_heading = "Coaching")]
pub struct CoachOptions {
    /// Coach settings in TOML; flags below override the file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report only correct/incorrect, without hint categories
    #[arg(long)]
    pub no_hints: bool,

    /// Never show molecule-specific tips
    #[arg(long)]
    pub no_tips: bool,

    /// How an incorrect central-atom choice is handled
    #[arg(long = "central", value_name = "POLICY")]
    pub central_policy: Option<CentralPolicyArg>,

    /// Ask for the central atom of diatomic molecules too
    #[arg(long)]
    pub no_auto_lock: bool,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub common: CommonOptions,

    /// Also verify that every answer key spends exactly the valence electrons
    #[arg(long)]
    pub verify: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Molecule formula, as listed by `lcoach list`
    #[arg(value_name = "FORMULA")]
    pub formula: String,

    #[command(flatten)]
    pub common: CommonOptions,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Molecule formula (a random one if omitted)
    #[arg(value_name = "FORMULA")]
    pub formula: Option<String>,

    /// Seed for the random pick
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub common: CommonOptions,

    #[command(flatten)]
    pub coach: CoachOptions,
}

#[derive(Args)]
pub struct PracticeArgs {
    /// Number of molecules in the set
    #[arg(short = 'n', long, value_name = "N", default_value = "5")]
    pub size: usize,

    /// Seed for the molecule order (reproducible sets)
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub common: CommonOptions,

    #[command(flatten)]
    pub coach: CoachOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CentralPolicyArg {
    /// Keep a wrong choice and report it as a hint on check
    Lenient,
    /// Refuse a wrong choice until the right atom is picked
    Strict,
}

impl From<CentralPolicyArg> for CentralPolicy {
    fn from(arg: CentralPolicyArg) -> Self {
        match arg {
            CentralPolicyArg::Lenient => CentralPolicy::Lenient,
            CentralPolicyArg::Strict => CentralPolicy::Strict,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn coach_flags_parse() {
        let cli = Cli::try_parse_from([
            "lcoach",
            "build",
            "CO2",
            "--no-hints",
            "--central",
            "strict",
            "-q",
        ])
        .unwrap();
        let Command::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.formula.as_deref(), Some("CO2"));
        assert!(args.coach.no_hints);
        assert_eq!(args.coach.central_policy, Some(CentralPolicyArg::Strict));
        assert!(args.common.quiet);
    }

    #[test]
    fn practice_defaults() {
        let cli = Cli::try_parse_from(["lcoach", "p", "--seed", "7"]).unwrap();
        let Command::Practice(args) = cli.command else {
            panic!("expected practice");
        };
        assert_eq!(args.size, 5);
        assert_eq!(args.seed, Some(7));
        assert!(args.common.catalog.is_none());
    }
}
