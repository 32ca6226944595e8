use clap::Subcommand;
use std::path::PathBuf;
use crate::structs::process_args::ProcessArgs;

#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample configuration file
    Init {
        #[clap(short, long)]
        force: bool,
    },
    /// Send every file in the input folder to Gemini and write the responses
    Process(ProcessArgs),
    /// Show the pre-flight report for an input folder without calling the API
    Scan {
        #[clap(short, long)]
        input: Option<PathBuf>,
        #[clap(short, long)]
        output: Option<PathBuf>,
        #[clap(short, long)]
        recursive: bool,
    },
    /// List the models that support content generation
    Models {
        #[clap(long)]
        api_key: Option<String>,
    },
    /// Check an API key and store it in the configuration file
    Key {
        api_key: String,
    },
    /// Check the configuration file
    Validate,
}
