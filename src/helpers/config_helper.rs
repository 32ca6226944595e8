use crate::config::constants::{
    DEFAULT_DELAY_SECS, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_RETRY_BACKOFF_SECS, GEMINI_API_KEY_ENV, GEMINI_BASE_URL,
};

pub struct ConfigHelper;

impl ConfigHelper {
    pub fn default_model() -> String {
        DEFAULT_MODEL.to_string()
    }

    pub fn default_api_key_env() -> String {
        GEMINI_API_KEY_ENV.to_string()
    }

    pub fn default_base_url() -> String {
        GEMINI_BASE_URL.to_string()
    }

    pub const fn default_disable_safety_filters() -> bool {
        true
    }

    pub const fn default_request_timeout_secs() -> u64 {
        DEFAULT_REQUEST_TIMEOUT_SECS
    }

    pub const fn default_delay_secs() -> u64 {
        DEFAULT_DELAY_SECS
    }

    pub const fn default_concurrency() -> usize {
        1
    }

    pub const fn default_max_retries() -> u32 {
        DEFAULT_MAX_RETRIES
    }

    pub const fn default_retry_backoff_secs() -> u64 {
        DEFAULT_RETRY_BACKOFF_SECS
    }

    pub fn default_exclude_patterns() -> Vec<String> {
        vec![
            ".git/".to_string(),
            ".DS_Store".to_string(),
            "Thumbs.db".to_string(),
        ]
    }
}
