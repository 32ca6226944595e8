use std::time::Duration;

pub const CONFIG_DIR_NAME: &str = ".flatgem";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const KEY_CHECK_MODEL: &str = "gemini-2.5-flash";
pub const KEY_CHECK_TEXT: &str = "test";
pub const FALLBACK_MODELS: &[&str] = &["gemini-1.5-pro-latest", "gemini-2.5-flash"];
pub const MODELS_PAGE_SIZE: u32 = 1000;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_DELAY_SECS: u64 = 10;
pub const MAX_DELAY_SECS: u64 = 300;
pub const MAX_CONCURRENCY: usize = 16;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_BACKOFF_SECS: u64 = 5;
pub const MAX_RETRY_BACKOFF_SECS: u64 = 120;

pub const NO_EXTENSION_LABEL: &str = ".no_extension";

pub const HARM_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];
pub const BLOCK_NONE: &str = "BLOCK_NONE";

/// Exponential backoff for the given zero-based retry attempt, capped.
pub fn retry_backoff(base_secs: u64, attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt);
    Duration::from_secs(base_secs.saturating_mul(factor).min(MAX_RETRY_BACKOFF_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_backoff_doubles_and_caps() {
        assert_eq!(retry_backoff(5, 0), Duration::from_secs(5));
        assert_eq!(retry_backoff(5, 2), Duration::from_secs(20));
        assert_eq!(retry_backoff(5, 10), Duration::from_secs(MAX_RETRY_BACKOFF_SECS));
    }
}
