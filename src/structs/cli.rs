use clap::Parser;
use std::path::PathBuf;
use crate::enums::commands::Commands;

#[derive(Parser)]
#[clap(name = "flatgem")]
#[clap(version, about = "Batch-process a folder of files through Google Gemini", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Path to the configuration file (defaults to ~/.flatgem/config.toml)
    #[clap(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,
}
