use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

/// Settings for a batch run; every field can be overridden from the command line.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProcessingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,

    #[serde(default)]
    pub output_extension: String,

    #[serde(default = "ConfigHelper::default_delay_secs")]
    pub delay_secs: u64,

    #[serde(default)]
    pub recursive: bool,

    #[serde(default)]
    pub thinking_mode: bool,

    #[serde(default = "ConfigHelper::default_concurrency")]
    pub concurrency: usize,

    #[serde(default = "ConfigHelper::default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "ConfigHelper::default_retry_backoff_secs")]
    pub retry_backoff_secs: u64,

    #[serde(default = "ConfigHelper::default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            prompt: None,
            prompt_file: None,
            input_dir: None,
            output_dir: None,
            output_extension: String::new(),
            delay_secs: ConfigHelper::default_delay_secs(),
            recursive: false,
            thinking_mode: false,
            concurrency: ConfigHelper::default_concurrency(),
            max_retries: ConfigHelper::default_max_retries(),
            retry_backoff_secs: ConfigHelper::default_retry_backoff_secs(),
            exclude_patterns: ConfigHelper::default_exclude_patterns(),
        }
    }
}
