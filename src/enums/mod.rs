pub mod ai_provider_error;
pub mod commands;
pub mod file_outcome;
pub mod key_status;
