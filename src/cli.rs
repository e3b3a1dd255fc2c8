use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ler-extract",
    version,
    about = "Rule-based component failure extraction for Licensee Event Reports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Inventory(InventoryArgs),
    Extract(ExtractArgs),
    Clean(CleanArgs),
    Summary(SummaryArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    #[arg(default_value = "../data/ler_texts")]
    pub input_dir: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Directory of per-report text files.
    #[arg(default_value = "../data/ler_texts")]
    pub input_dir: PathBuf,

    /// Raw extraction JSON.
    #[arg(short, long, default_value = "component_failure.json")]
    pub output: PathBuf,

    /// Cleaned JSON; defaults to <output>.cleaned.json.
    #[arg(long)]
    pub clean_output: Option<PathBuf>,

    /// Run manifest; defaults to <output>.run.json.
    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    /// TOML file overriding the built-in rule tables.
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    /// Raw extraction JSON produced by `extract`.
    pub input: PathBuf,

    #[arg(long)]
    pub clean_output: Option<PathBuf>,

    #[arg(long)]
    pub rules: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    /// Cleaned JSON produced by `extract` or `clean`.
    pub input: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}
