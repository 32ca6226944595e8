use std::fs;
use std::path::{Path, PathBuf};
use crate::config::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, MAX_CONCURRENCY, MAX_DELAY_SECS};
use crate::errors::{FlatGemError, FlatGemResult};
use crate::structs::config::config::Config;
use crate::structs::processing_job::same_folder;

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path: path.unwrap_or_else(Self::default_path),
        }
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_default()
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> FlatGemResult<Config> {
        if !self.path.exists() {
            log::debug!("No config at {}, using defaults", self.path.display());
            return Ok(Config::default());
        }

        log::debug!("📋 Loading config from: {}", self.path.display());
        let content = fs::read_to_string(&self.path)
            .map_err(|e| FlatGemError::config_file_error(&self.path.to_string_lossy(), &e.to_string()))?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> FlatGemResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| FlatGemError::config_file_error(&parent.to_string_lossy(), &e.to_string()))?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.path, content)
            .map_err(|e| FlatGemError::config_file_error(&self.path.to_string_lossy(), &e.to_string()))?;
        log::debug!("Config saved to {}", self.path.display());
        Ok(())
    }

    pub fn create_sample_config(&self, force: bool) -> FlatGemResult<()> {
        if self.path.exists() && !force {
            return Err(FlatGemError::config_error(
                &format!("Config already exists at {}", self.path.display()),
                None,
                Some("Pass --force to overwrite it"),
            ));
        }

        let sample_config = format!(r#"# FlatGem configuration

[ai]
# The key can also come from the environment variable named below, or --api-key.
# api_key = "your-gemini-api-key"
api_key_env = "GEMINI_API_KEY"
model = "gemini-2.5-flash"
base_url = "https://generativelanguage.googleapis.com/v1beta"
# temperature = 0.7
# max_output_tokens = 8192

# Send every harm category with BLOCK_NONE
disable_safety_filters = true

# Optional cap across all requests, on top of the per-file delay
# rate_limit_per_minute = 10
request_timeout_secs = 300

[processing]
# The instructions sent with every file. Test on one or two files first.
prompt = "{prompt}"
# prompt_file = "/home/user/prompts/translate.txt"

# input_dir = "/home/user/Documents/Input_Folder"
# output_dir = "/home/user/Documents/Output_Folder"

# Leave empty to keep the original extension, e.g. ".json"
output_extension = ""

# Seconds between files (0-{max_delay}). The free plan has a low requests-per-minute limit.
delay_secs = 10

# Walk subfolders and recreate them in the output folder
recursive = false

# Ask the model to plan before answering, output only the result
thinking_mode = false

# Requests in flight at once (1-{max_concurrency}); still paced by delay_secs
concurrency = 1

# Retries for rate-limit, server and network errors
max_retries = 2
retry_backoff_secs = 5

exclude_patterns = [".git/", ".DS_Store", "Thumbs.db"]
"#,
            prompt = crate::constants::prompts::SAMPLE_PROMPT,
            max_delay = MAX_DELAY_SECS,
            max_concurrency = MAX_CONCURRENCY,
        );

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, sample_config)?;
        log::info!("✅ Created sample config at: {}", self.path.display());
        Ok(())
    }

    pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let processing = &config.processing;

        if processing.delay_secs > MAX_DELAY_SECS {
            errors.push(format!("processing.delay_secs must be between 0 and {MAX_DELAY_SECS}, got {}", processing.delay_secs));
        }

        if processing.concurrency == 0 || processing.concurrency > MAX_CONCURRENCY {
            errors.push(format!("processing.concurrency must be between 1 and {MAX_CONCURRENCY}, got {}", processing.concurrency));
        }

        if let Some(prompt_file) = &processing.prompt_file {
            if !Path::new(prompt_file).is_file() {
                errors.push(format!("Prompt file does not exist: {prompt_file}"));
            }
        }

        if let Some(input_dir) = &processing.input_dir {
            if !Path::new(input_dir).is_dir() {
                errors.push(format!("Input folder does not exist: {input_dir}"));
            }

            if let Some(output_dir) = &processing.output_dir {
                if same_folder(Path::new(input_dir), Path::new(output_dir)) {
                    errors.push("Input and output folders cannot be the same".to_string());
                }
            }
        }

        if config.ai.model.trim().is_empty() {
            errors.push("ai.model must not be empty".to_string());
        }

        if config.ai.temperature.is_some_and(|t| !(0.0..=2.0).contains(&t)) {
            errors.push("ai.temperature must be between 0.0 and 2.0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Key from the command line, then the configured environment variable, then the config file.
    pub fn resolve_api_key(config: &Config, cli_key: Option<&str>) -> FlatGemResult<String> {
        cli_key
            .map(ToString::to_string)
            .or_else(|| std::env::var(&config.ai.api_key_env).ok())
            .or_else(|| config.ai.api_key.clone())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| FlatGemError::config_error(
                "No Gemini API key found",
                Some("ai.api_key"),
                Some(&format!("Run 'flatgem key <KEY>', set {}, or pass --api-key", config.ai.api_key_env)),
            ))
    }
}
