use async_trait::async_trait;
use crate::enums::ai_provider_error::AiProviderError;
use crate::structs::prompt_payload::PromptPayload;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiProvider: Send + Sync {

    async fn generate_content(&self, payload: &PromptPayload) -> Result<String, AiProviderError>;

    async fn count_tokens(&self, text: &str) -> Result<u64, AiProviderError>;

    async fn list_models(&self) -> Result<Vec<String>, AiProviderError>;
}
