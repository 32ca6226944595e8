use std::fmt;
use std::error::Error as StdError;
use crate::enums::ai_provider_error::AiProviderError;

#[derive(Debug, Clone)]
pub enum FlatGemError {
    // Configuration errors
    ConfigurationError {
        message: String,
        field: Option<String>,
        suggestion: Option<String>,
    },
    ConfigurationFileError {
        path: String,
        reason: String,
    },

    // File operation errors
    FileOperationError {
        file_path: String,
        operation: String,
        reason: String,
    },

    // Parser errors
    ParseError {
        content_type: String,
        line_number: Option<usize>,
        reason: String,
    },

    // Network/API errors
    NetworkError {
        operation: String,
        url: Option<String>,
        status_code: Option<u16>,
        reason: String,
    },
    ProviderError(AiProviderError),

    // Validation errors
    ValidationError {
        field: String,
        value: String,
        constraint: String,
        suggestion: Option<String>,
    },

    // System errors
    SystemError {
        operation: String,
        reason: String,
    },

    // User input errors
    UserInputError {
        input: String,
        expected: String,
        suggestion: String,
    },

    // Batch run finished but not every file made it
    ProcessingIncomplete {
        failed: usize,
        total: usize,
    },
}

impl FlatGemError {
    pub fn config_error(message: &str, field: Option<&str>, suggestion: Option<&str>) -> Self {
        Self::ConfigurationError {
            message: message.to_string(),
            field: field.map(ToString::to_string),
            suggestion: suggestion.map(ToString::to_string),
        }
    }

    pub fn config_file_error(path: &str, reason: &str) -> Self {
        Self::ConfigurationFileError {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn file_error(file_path: &str, operation: &str, reason: &str) -> Self {
        Self::FileOperationError {
            file_path: file_path.to_string(),
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn validation_error(field: &str, value: &str, constraint: &str, suggestion: Option<&str>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
            suggestion: suggestion.map(ToString::to_string),
        }
    }

    pub fn user_input_error(input: &str, expected: &str, suggestion: &str) -> Self {
        Self::UserInputError {
            input: input.to_string(),
            expected: expected.to_string(),
            suggestion: suggestion.to_string(),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NetworkError { .. }
            | Self::UserInputError { .. }
            | Self::ValidationError { .. }
            | Self::ConfigurationError { .. }
            | Self::ProcessingIncomplete { .. } => true,
            Self::ProviderError(e) => e.is_retryable(),
            _ => false,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SystemError { .. } => ErrorSeverity::Critical,
            Self::FileOperationError { .. } | Self::ConfigurationFileError { .. } => ErrorSeverity::High,
            Self::ParseError { .. }
            | Self::NetworkError { .. }
            | Self::ProviderError(_)
            | Self::ProcessingIncomplete { .. } => ErrorSeverity::Medium,
            Self::ValidationError { .. } | Self::ConfigurationError { .. } | Self::UserInputError { .. } => {
                ErrorSeverity::Low
            }
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigurationError { message, field, suggestion } => {
                let mut msg = format!("Configuration Error: {message}");
                if let Some(field) = field {
                    msg.push_str(&format!(" (field: {field})"));
                }
                if let Some(suggestion) = suggestion {
                    msg.push_str(&format!("\n💡 Suggestion: {suggestion}"));
                }
                msg
            }
            Self::ConfigurationFileError { path, reason } => {
                format!("Configuration file error at '{path}': {reason}\n💡 Check file permissions and syntax")
            }
            Self::FileOperationError { file_path, operation, reason } => {
                format!("File operation '{operation}' failed for '{file_path}': {reason}\n💡 Check file permissions and path")
            }
            Self::ParseError { content_type, line_number, reason } => {
                let mut msg = format!("Parse error in {content_type}: {reason}");
                if let Some(line) = line_number {
                    msg.push_str(&format!(" (line {line})"));
                }
                msg.push_str("\n💡 Check the format and syntax of the input");
                msg
            }
            Self::NetworkError { operation, url, status_code, reason } => {
                let mut msg = format!("Network error during {operation}: {reason}");
                if let Some(url) = url {
                    msg.push_str(&format!(" (URL: {url})"));
                }
                if let Some(code) = status_code {
                    msg.push_str(&format!(" (Status: {code})"));
                }
                msg.push_str("\n💡 Check your internet connection and try again");
                msg
            }
            Self::ProviderError(e) => {
                format!("{e}\n💡 Check your API key, model name and quota")
            }
            Self::ValidationError { field, value, constraint, suggestion } => {
                let mut msg = format!("Validation error for field '{field}': value '{value}' violates constraint '{constraint}'");
                if let Some(suggestion) = suggestion {
                    msg.push_str(&format!("\n💡 Suggestion: {suggestion}"));
                }
                msg
            }
            Self::SystemError { operation, reason } => {
                format!("System error during {operation}: {reason}")
            }
            Self::UserInputError { input, expected, suggestion } => {
                format!("Invalid input '{input}': expected {expected}\n💡 {suggestion}")
            }
            Self::ProcessingIncomplete { failed, total } => {
                format!("{failed} of {total} files could not be processed\n💡 Re-run after fixing the errors listed above")
            }
        }
    }

    pub fn technical_details(&self) -> String {
        format!("{self:?}")
    }
}

impl fmt::Display for FlatGemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl StdError for FlatGemError {}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Low => "🟢",
            Self::Medium => "🟡",
            Self::High => "🟠",
            Self::Critical => "🔴",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// Result type alias for flatgem operations
pub type FlatGemResult<T> = Result<T, FlatGemError>;

/// Error handler for consistent error processing
pub struct ErrorHandler;

impl ErrorHandler {
    /// Handle error with appropriate logging and user feedback
    pub fn handle_error(error: &FlatGemError) {
        let severity = error.severity();

        log::debug!("[{}] {}", severity.name(), error.technical_details());
        eprintln!("{} {}", severity.emoji(), error.user_message());

        if error.is_recoverable() {
            eprintln!("🔄 This error is recoverable - you can retry the operation");
        }
    }
}

impl From<std::io::Error> for FlatGemError {
    fn from(error: std::io::Error) -> Self {
        Self::SystemError {
            operation: "I/O operation".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for FlatGemError {
    fn from(error: toml::de::Error) -> Self {
        Self::ParseError {
            content_type: "TOML".to_string(),
            line_number: None,
            reason: error.message().to_string(),
        }
    }
}

impl From<toml::ser::Error> for FlatGemError {
    fn from(error: toml::ser::Error) -> Self {
        Self::ParseError {
            content_type: "TOML".to_string(),
            line_number: None,
            reason: error.to_string(),
        }
    }
}

impl From<AiProviderError> for FlatGemError {
    fn from(error: AiProviderError) -> Self {
        Self::ProviderError(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_become_critical_system_errors() {
        let err: FlatGemError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.is_recoverable());
        assert!(err.user_message().contains("denied"));
    }

    #[test]
    fn rate_limited_provider_errors_are_recoverable() {
        let err = FlatGemError::from(AiProviderError::RateLimited("slow down".to_string()));
        assert!(err.is_recoverable());

        let err = FlatGemError::from(AiProviderError::AuthenticationError("bad key".to_string()));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn validation_message_carries_suggestion() {
        let err = FlatGemError::validation_error("delay_secs", "900", "0..=300", Some("Use 10s for large batches"));
        let msg = err.to_string();
        assert!(msg.contains("delay_secs"));
        assert!(msg.contains("Use 10s for large batches"));
    }
}
