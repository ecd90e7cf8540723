use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Design-event selection for Monte-Carlo flood ensembles.
#[derive(Parser)]
#[command(
    name = "aepsel",
    version,
    about = "Select design events per AEP tier from Monte-Carlo flood results"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Rank candidates, build ensembles and export the envelope.
    Select(SelectArgs),
    /// Convert a rainfall-depth tensor into a rainfall-AEP tensor.
    RainAep(RainAepArgs),
}

/// Arguments for the `select` subcommand.
#[derive(clap::Args)]
pub struct SelectArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "aepsel.toml")]
    pub config: PathBuf,

    /// Override report output path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override accumulation depth from config.
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Run tiers sequentially.
    #[arg(long)]
    pub sequential: bool,
}

/// Arguments for the `rain-aep` subcommand.
#[derive(clap::Args)]
pub struct RainAepArgs {
    /// Path to TOML configuration file (zones and IFD tables).
    #[arg(short, long, default_value = "aepsel.toml")]
    pub config: PathBuf,

    /// Rainfall-depth tensor; defaults to `[io].rainfall_depths`.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Path for the rainfall-AEP tensor.
    #[arg(short, long)]
    pub output: PathBuf,
}
