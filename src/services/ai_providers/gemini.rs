use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use crate::config::constants::MODELS_PAGE_SIZE;
use crate::enums::ai_provider_error::AiProviderError;
use crate::services::rate_limiter::ApiRateLimiter;
use crate::structs::ai::gemini::gemini_content::GeminiContent;
use crate::structs::ai::gemini::gemini_generation_config::GeminiGenerationConfig;
use crate::structs::ai::gemini::gemini_model::{GeminiModel, GeminiModelList};
use crate::structs::ai::gemini::gemini_request::{GeminiRequest, GeminiTokenCountRequest};
use crate::structs::ai::gemini::gemini_response::{GeminiResponse, GeminiTokenCountResponse};
use crate::structs::ai::gemini::gemini_safety_setting::GeminiSafetySetting;
use crate::structs::config::ai_config::AiConfig;
use crate::structs::prompt_payload::PromptPayload;
use crate::traits::ai_provider::AiProvider;

#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    client: Client,
    model: String,
    generation_config: GeminiGenerationConfig,
    disable_safety_filters: bool,
    rate_limiter: ApiRateLimiter,
}

impl GeminiProvider {
    pub fn new(api_key: &str, config: &AiConfig, rate_limiter: ApiRateLimiter) -> Result<Self, AiProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AiProviderError::NetworkError(e.to_string()))?;

        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            model: config.model.clone(),
            generation_config: GeminiGenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
            },
            disable_safety_filters: config.disable_safety_filters,
            rate_limiter,
        })
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.trim().to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn get_request(&self, payload: &PromptPayload) -> GeminiRequest {
        let system_instruction = if payload.system_instruction.trim().is_empty() {
            None
        } else {
            Some(GeminiContent::instruction(payload.system_instruction.clone()))
        };

        GeminiRequest {
            system_instruction,
            contents: vec![GeminiContent::user(payload.user_content.clone())],
            generation_config: if self.generation_config.is_empty() {
                None
            } else {
                Some(self.generation_config.clone())
            },
            safety_settings: self.disable_safety_filters.then(GeminiSafetySetting::disabled),
        }
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    async fn send_json<T: serde::Serialize + Sync>(&self, url: &str, body: &T) -> Result<reqwest::Response, AiProviderError> {
        self.rate_limiter.acquire().await;

        let response = self.client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AiProviderError::NetworkError(e.to_string()))?;

        Self::check_status(response).await
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AiProviderError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        log::debug!("Gemini API error response ({status}): {error_text}");

        Err(AiProviderError::from_status(status, Self::error_message(&error_text)))
    }

    /// Pull `error.message` out of a Gemini error body, falling back to the raw text.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                json.get("error")
                    .and_then(|error| error.get("message"))
                    .and_then(|message| message.as_str())
                    .map(ToString::to_string)
            })
            .unwrap_or_else(|| body.to_string())
    }

    pub fn extract_text(response: GeminiResponse) -> Result<String, AiProviderError> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(AiProviderError::Blocked(reason));
        };

        let text = candidate
            .content
            .as_ref()
            .map(GeminiContent::joined_text)
            .unwrap_or_default();

        if text.is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "empty response".to_string());
            return Err(AiProviderError::Blocked(reason));
        }

        Ok(text)
    }

    /// Gemini models first, then Gemma, then everything else; each group newest-looking name first.
    pub fn sort_models(models: Vec<GeminiModel>) -> Vec<String> {
        let names: Vec<String> = models
            .into_iter()
            .filter(|m| m.supported_generation_methods.iter().any(|method| method == "generateContent"))
            .map(|m| m.name.trim_start_matches("models/").to_string())
            .collect();

        let mut gemini: Vec<String> = names.iter().filter(|n| n.contains("gemini")).cloned().collect();
        let mut gemma: Vec<String> = names.iter().filter(|n| n.contains("gemma") && !n.contains("gemini")).cloned().collect();
        let mut other: Vec<String> = names.iter().filter(|n| !n.contains("gemini") && !n.contains("gemma")).cloned().collect();

        for group in [&mut gemini, &mut gemma, &mut other] {
            group.sort_by(|a, b| b.cmp(a));
        }

        gemini.into_iter().chain(gemma).chain(other).collect()
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    async fn generate_content(&self, payload: &PromptPayload) -> Result<String, AiProviderError> {
        if self.model.is_empty() {
            return Err(AiProviderError::ModelNotFound("Model is not set".to_string()));
        }

        log::debug!("📦 Request model: {}", self.model);

        let url = self.model_url(&self.model, "generateContent");
        let request_body = self.get_request(payload);
        let response = self.send_json(&url, &request_body).await?;

        let body: GeminiResponse = response.json().await
            .map_err(|e| AiProviderError::SerializationError(e.to_string()))?;

        Self::extract_text(body)
    }

    async fn count_tokens(&self, text: &str) -> Result<u64, AiProviderError> {
        let url = self.model_url(&self.model, "countTokens");
        let request_body = GeminiTokenCountRequest {
            contents: vec![GeminiContent::user(text)],
        };
        let response = self.send_json(&url, &request_body).await?;

        let body: GeminiTokenCountResponse = response.json().await
            .map_err(|e| AiProviderError::SerializationError(e.to_string()))?;

        Ok(body.total_tokens)
    }

    async fn list_models(&self) -> Result<Vec<String>, AiProviderError> {
        let url = format!("{}/models", self.base_url);
        let page_size = MODELS_PAGE_SIZE.to_string();
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            self.rate_limiter.acquire().await;

            let mut request = self.client
                .get(&url)
                .query(&[("key", self.api_key.as_str()), ("pageSize", page_size.as_str())]);
            if let Some(token) = page_token.take() {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| AiProviderError::NetworkError(e.to_string()))?;
            let response = Self::check_status(response).await?;

            let page: GeminiModelList = response.json().await
                .map_err(|e| AiProviderError::SerializationError(e.to_string()))?;

            models.extend(page.models);

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        log::debug!("Fetched {} models", models.len());
        Ok(Self::sort_models(models))
    }
}
