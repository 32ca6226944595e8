use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AiProviderError {
    #[error("Gemini API Error: {0}")]
    ApiError(String),
    #[error("Network Error: {0}")]
    NetworkError(String),
    #[error("Serialization Error: {0}")]
    SerializationError(String),
    #[error("Authentication Error: {0}")]
    AuthenticationError(String),
    #[error("Model Not Found: {0}")]
    ModelNotFound(String),
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("Server Error ({status}): {message}")]
    ServerError { status: u16, message: String },
    #[error("Response blocked: {0}")]
    Blocked(String),
}

impl AiProviderError {
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            400 => Self::ApiError(format!("Bad request: {body}")),
            401 | 403 => Self::AuthenticationError(body),
            404 => Self::ModelNotFound(body),
            429 => Self::RateLimited(body),
            500..=599 => Self::ServerError { status, message: body },
            _ => Self::ApiError(format!("HTTP {status}: {body}")),
        }
    }

    /// Whether repeating the same request later can succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError(_) | Self::RateLimited(_) | Self::ServerError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_variants() {
        assert!(matches!(AiProviderError::from_status(400, String::new()), AiProviderError::ApiError(_)));
        assert!(matches!(AiProviderError::from_status(403, String::new()), AiProviderError::AuthenticationError(_)));
        assert!(matches!(AiProviderError::from_status(404, String::new()), AiProviderError::ModelNotFound(_)));
        assert!(matches!(AiProviderError::from_status(503, String::new()), AiProviderError::ServerError { status: 503, .. }));
    }

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(AiProviderError::from_status(429, String::new()).is_retryable());
        assert!(AiProviderError::from_status(500, String::new()).is_retryable());
        assert!(AiProviderError::NetworkError("reset".to_string()).is_retryable());
        assert!(!AiProviderError::from_status(400, String::new()).is_retryable());
        assert!(!AiProviderError::Blocked("SAFETY".to_string()).is_retryable());
    }
}
