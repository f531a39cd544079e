use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Andy M. Lau",
    version,
    about = "ChargeRoulette - Randomly sample surface-exposed basic residues to charge for gas-phase simulations.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output and progress bars
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw unique random sets of basic residues to charge from a depth-annotated structure.
    Spin(SpinArgs),
    /// Write the chargeable residues of a structure without sampling.
    Extract(ExtractArgs),
}

/// Arguments for the `spin` subcommand.
#[derive(Args, Debug)]
pub struct SpinArgs {
    // --- Core Arguments ---
    /// Path to the depth-annotated input structure (PDB).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory the output files are written to.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub outdir: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Sampling ---
    /// Number of residues charged in each sample.
    #[arg(short = 'n', long, value_name = "INT")]
    pub n_charges: Option<usize>,

    /// Number of unique samples to draw.
    #[arg(short = 's', long, value_name = "INT")]
    pub n_samples: Option<usize>,

    /// Consecutive duplicate draws tolerated before giving up.
    #[arg(short, long, value_name = "INT")]
    pub patience: Option<usize>,

    /// Seed the random number generator for a reproducible run.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub selection: SelectionArgs,

    // --- Output ---
    /// Also write a human-readable report with one block per sample.
    #[arg(long)]
    pub report: bool,
}

/// Arguments for the `extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Path to the depth-annotated input structure (PDB).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory the output file is written to.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub outdir: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Options deciding which residues are candidates, shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Do not charge lysines.
    #[arg(short = 'K', long)]
    pub no_lys: bool,

    /// Do not charge arginines.
    #[arg(short = 'R', long)]
    pub no_arg: bool,

    /// Do not charge histidines.
    #[arg(short = 'H', long)]
    pub no_his: bool,

    /// Keep residues whose CA depth is strictly below this value, in angstroms.
    #[arg(short, long, value_name = "FLOAT")]
    pub depth: Option<f64>,

    /// Skip atom lines whose depth column cannot be parsed instead of failing.
    #[arg(long)]
    pub skip_invalid_depth: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn spin_parses_short_flags() {
        let cli = Cli::parse_from([
            "roulette", "spin", "-i", "in.pdb", "-o", "out", "-n", "5", "-s", "10", "-K", "-H",
            "-d", "4.5", "-p", "20",
        ]);
        let Commands::Spin(args) = cli.command else {
            panic!("Expected 'spin' subcommand");
        };
        assert_eq!(args.input, PathBuf::from("in.pdb"));
        assert_eq!(args.outdir, PathBuf::from("out"));
        assert_eq!(args.n_charges, Some(5));
        assert_eq!(args.n_samples, Some(10));
        assert_eq!(args.patience, Some(20));
        assert_eq!(args.selection.depth, Some(4.5));
        assert!(args.selection.no_lys);
        assert!(!args.selection.no_arg);
        assert!(args.selection.no_his);
        assert!(!args.report);
    }

    #[test]
    fn global_flags_are_accepted_after_the_subcommand() {
        let cli = Cli::parse_from(["roulette", "extract", "-i", "in.pdb", "-o", "out", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Extract(_)));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from([
            "roulette", "-q", "-v", "extract", "-i", "in.pdb", "-o", "out",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn input_is_required() {
        let result = Cli::try_parse_from(["roulette", "spin", "-o", "out", "-n", "1", "-s", "1"]);
        assert!(result.is_err());
    }
}
