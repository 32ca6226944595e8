use clap::Args;
use std::path::PathBuf;

/// Command-line overrides for a batch run. Unset values fall back to the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ProcessArgs {
    /// Folder with the files to process
    #[clap(short, long)]
    pub input: Option<PathBuf>,
    /// Folder the responses are written to
    #[clap(short, long)]
    pub output: Option<PathBuf>,
    /// System instruction sent with every file
    #[clap(short, long, conflicts_with = "prompt_file")]
    pub prompt: Option<String>,
    /// Read the system instruction from a file
    #[clap(long)]
    pub prompt_file: Option<PathBuf>,
    #[clap(short, long)]
    pub model: Option<String>,
    /// Output file extension, e.g. ".json"; empty keeps the original one
    #[clap(short, long)]
    pub ext: Option<String>,
    /// Seconds to wait between files
    #[clap(short, long)]
    pub delay: Option<u64>,
    /// Walk subfolders and mirror them in the output folder
    #[clap(short, long)]
    pub recursive: bool,
    /// Ask the model to plan before answering
    #[clap(long)]
    pub thinking: bool,
    /// Requests in flight at once; still paced by the delay
    #[clap(long)]
    pub concurrency: Option<usize>,
    /// Retries for rate-limit, server and network errors
    #[clap(long)]
    pub retries: Option<u32>,
    #[clap(long)]
    pub api_key: Option<String>,
    /// Skip the confirmation prompt when the pre-flight check has warnings
    #[clap(short, long)]
    pub yes: bool,
    /// Remember these settings in the config file
    #[clap(long)]
    pub save: bool,
}
