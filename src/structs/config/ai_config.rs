use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "ConfigHelper::default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "ConfigHelper::default_model")]
    pub model: String,

    #[serde(default = "ConfigHelper::default_base_url")]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    #[serde(default = "ConfigHelper::default_disable_safety_filters")]
    pub disable_safety_filters: bool,

    /// Hard cap shared by every API call, on top of the per-file delay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit_per_minute: Option<u32>,

    #[serde(default = "ConfigHelper::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: ConfigHelper::default_api_key_env(),
            model: ConfigHelper::default_model(),
            base_url: ConfigHelper::default_base_url(),
            temperature: None,
            max_output_tokens: None,
            disable_safety_filters: ConfigHelper::default_disable_safety_filters(),
            rate_limit_per_minute: None,
            request_timeout_secs: ConfigHelper::default_request_timeout_secs(),
        }
    }
}
