use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::config::constants::{MAX_CONCURRENCY, MAX_DELAY_SECS};
use crate::errors::{FlatGemError, FlatGemResult};
use crate::structs::config::config::Config;
use crate::structs::process_args::ProcessArgs;

/// Fully resolved settings for one batch run.
#[derive(Debug, Clone)]
pub struct ProcessingJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub system_prompt: String,
    pub model: String,
    pub output_extension: String,
    pub delay: Duration,
    pub recursive: bool,
    pub thinking_mode: bool,
    pub concurrency: usize,
    pub max_retries: u32,
    pub retry_backoff_secs: u64,
    pub exclude_patterns: Vec<String>,
}

impl ProcessingJob {
    /// Merge command-line overrides over the config file.
    pub fn resolve(config: &Config, args: &ProcessArgs) -> FlatGemResult<Self> {
        let processing = &config.processing;

        let input_dir = args.input.clone()
            .or_else(|| processing.input_dir.as_ref().map(PathBuf::from))
            .ok_or_else(|| FlatGemError::config_error(
                "No input folder given",
                Some("processing.input_dir"),
                Some("Pass --input or set input_dir in the config file"),
            ))?;

        let output_dir = args.output.clone()
            .or_else(|| processing.output_dir.as_ref().map(PathBuf::from))
            .ok_or_else(|| FlatGemError::config_error(
                "No output folder given",
                Some("processing.output_dir"),
                Some("Pass --output or set output_dir in the config file"),
            ))?;

        let system_prompt = Self::resolve_prompt(config, args)?;

        Ok(Self {
            input_dir,
            output_dir,
            system_prompt,
            model: args.model.clone().unwrap_or_else(|| config.ai.model.clone()),
            output_extension: args.ext.clone().unwrap_or_else(|| processing.output_extension.clone()),
            delay: Duration::from_secs(args.delay.unwrap_or(processing.delay_secs)),
            recursive: args.recursive || processing.recursive,
            thinking_mode: args.thinking || processing.thinking_mode,
            concurrency: args.concurrency.unwrap_or(processing.concurrency),
            max_retries: args.retries.unwrap_or(processing.max_retries),
            retry_backoff_secs: processing.retry_backoff_secs,
            exclude_patterns: processing.exclude_patterns.clone(),
        })
    }

    fn resolve_prompt(config: &Config, args: &ProcessArgs) -> FlatGemResult<String> {
        if let Some(prompt) = &args.prompt {
            return Ok(prompt.clone());
        }

        let prompt_file = args.prompt_file.clone()
            .or_else(|| config.processing.prompt_file.as_ref().map(PathBuf::from));

        if let Some(path) = prompt_file {
            return fs::read_to_string(&path).map_err(|e| {
                FlatGemError::file_error(&path.to_string_lossy(), "read prompt", &e.to_string())
            });
        }

        config.processing.prompt.clone().ok_or_else(|| FlatGemError::config_error(
            "No system prompt given",
            Some("processing.prompt"),
            Some("Pass --prompt or --prompt-file, or set prompt in the config file"),
        ))
    }

    pub fn validate(&self) -> FlatGemResult<()> {
        if self.system_prompt.trim().is_empty() {
            return Err(FlatGemError::validation_error("prompt", "", "must not be empty", Some("Describe what the model should do with each file")));
        }

        if self.model.trim().is_empty() {
            return Err(FlatGemError::validation_error("model", "", "must not be empty", Some("Run 'flatgem models' to list available models")));
        }

        if !self.input_dir.is_dir() {
            return Err(FlatGemError::validation_error(
                "input",
                &self.input_dir.to_string_lossy(),
                "must be an existing folder",
                None,
            ));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(FlatGemError::validation_error("output", "", "must not be empty", None));
        }

        if same_folder(&self.input_dir, &self.output_dir) {
            return Err(FlatGemError::validation_error(
                "output",
                &self.output_dir.to_string_lossy(),
                "must differ from the input folder",
                Some("The input and output folders cannot be the same, this would overwrite your original files"),
            ));
        }

        if self.delay.as_secs() > MAX_DELAY_SECS {
            return Err(FlatGemError::validation_error(
                "delay",
                &self.delay.as_secs().to_string(),
                &format!("0..={MAX_DELAY_SECS} seconds"),
                Some("10s is enough for large batches on the free plan"),
            ));
        }

        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(FlatGemError::validation_error(
                "concurrency",
                &self.concurrency.to_string(),
                &format!("1..={MAX_CONCURRENCY}"),
                None,
            ));
        }

        Ok(())
    }
}

/// Absolute form of `path`, resolving symlinks for the part of it that exists.
pub fn absolute_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => absolute_path(parent).join(name),
        _ => std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf()),
    }
}

pub fn same_folder(a: &Path, b: &Path) -> bool {
    absolute_path(a) == absolute_path(b)
}
