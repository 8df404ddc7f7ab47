use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan",
    version,
    about = "parmnet CLI - predicts bond, angle and torsion force-field parameters from molecular graphs.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used for batch parametrization.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict force-field parameters for one or more molecules and write them as CSV.
    Parametrize(ParametrizeArgs),
    /// Show the interaction tuples derived from a molecule.
    Inspect(InspectArgs),
}

/// Node representation strategy.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RepresentationChoice {
    /// Mean aggregation over neighbours (GraphSAGE).
    Sage,
    /// Multi-head graph attention.
    Attention,
}

/// Arguments for the `parametrize` subcommand.
#[derive(Args, Debug)]
pub struct ParametrizeArgs {
    // --- Core Arguments ---
    /// Molecule files in TOML format. Can be given multiple times.
    #[arg(short, long = "input", required = true, value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// Directory receiving one CSV file per molecule and interaction kind.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// Path to a model configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Model Overrides ---
    /// Override the node representation strategy.
    #[arg(long, value_enum)]
    pub representation: Option<RepresentationChoice>,

    /// Override the hidden width of the representation.
    #[arg(long, value_name = "INT")]
    pub hidden: Option<usize>,

    /// Override the number of message-passing rounds.
    #[arg(long, value_name = "INT")]
    pub depth: Option<usize>,

    /// Override the number of attention heads.
    #[arg(long, value_name = "INT")]
    pub heads: Option<usize>,

    /// Override the seed used to initialize the weights.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Also write force constants and equilibrium values derived from the raw parameters.
    #[arg(long)]
    pub readout: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S pooling.depth=3
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Molecule file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,
}
