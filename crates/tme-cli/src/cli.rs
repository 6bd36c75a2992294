use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tme",
    about = "Tile map editor core: run edit scenarios against an in-memory map",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Editor configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a scenario and report every step
    Run(ScenarioArgs),
    /// Run a scenario and print the resulting history
    Log(LogArgs),
    /// Show the resolved default variables of a type
    Vars(TypeArgs),
    /// List the distinct instances of a type after running a scenario
    Catalog(TypeArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ScenarioArgs {
    pub scenario: PathBuf,
}

#[derive(Args)]
pub struct LogArgs {
    pub scenario: PathBuf,
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args)]
pub struct TypeArgs {
    pub scenario: PathBuf,
    /// Type path, e.g. /obj/item
    #[arg(value_name = "TYPE")]
    pub path: String,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Ignore --config and print the built-in defaults
    #[arg(long)]
    pub defaults: bool,
}
