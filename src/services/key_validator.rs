use crate::config::constants::{KEY_CHECK_MODEL, KEY_CHECK_TEXT};
use crate::enums::ai_provider_error::AiProviderError;
use crate::enums::key_status::KeyStatus;
use crate::services::ai_providers::gemini::GeminiProvider;
use crate::services::rate_limiter::ApiRateLimiter;
use crate::structs::config::ai_config::AiConfig;
use crate::traits::ai_provider::AiProvider;

pub struct KeyValidator;

impl KeyValidator {
    /// Cheap round trip with the key: a token count on a small model.
    pub async fn check(api_key: &str, config: &AiConfig) -> KeyStatus {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return KeyStatus::Invalid("Please enter an API key.".to_string());
        }

        match GeminiProvider::new(api_key, config, ApiRateLimiter::default()) {
            Ok(provider) => Self::check_with(&provider.with_model(KEY_CHECK_MODEL)).await,
            Err(e) => KeyStatus::Unreachable(e.to_string()),
        }
    }

    pub async fn check_with(provider: &dyn AiProvider) -> KeyStatus {
        match provider.count_tokens(KEY_CHECK_TEXT).await {
            Ok(_) => KeyStatus::Valid,
            Err(AiProviderError::NetworkError(reason)) => KeyStatus::Unreachable(reason),
            Err(e) => KeyStatus::Invalid(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ai_provider::MockAiProvider;

    #[tokio::test]
    async fn empty_key_is_invalid_without_a_request() {
        let status = KeyValidator::check("   ", &AiConfig::default()).await;
        assert!(matches!(status, KeyStatus::Invalid(_)));
    }

    #[tokio::test]
    async fn successful_token_count_means_valid() {
        let mut provider = MockAiProvider::new();
        provider.expect_count_tokens().times(1).returning(|_| Ok(1));

        assert_eq!(KeyValidator::check_with(&provider).await, KeyStatus::Valid);
    }

    #[tokio::test]
    async fn auth_and_network_failures_are_told_apart() {
        let mut rejected = MockAiProvider::new();
        rejected.expect_count_tokens()
            .returning(|_| Err(AiProviderError::AuthenticationError("API key not valid".to_string())));
        assert!(matches!(KeyValidator::check_with(&rejected).await, KeyStatus::Invalid(_)));

        let mut offline = MockAiProvider::new();
        offline.expect_count_tokens()
            .returning(|_| Err(AiProviderError::NetworkError("dns error".to_string())));
        assert!(matches!(KeyValidator::check_with(&offline).await, KeyStatus::Unreachable(_)));
    }
}
