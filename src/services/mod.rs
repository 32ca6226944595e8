pub mod ai_providers;
pub mod file_processor;
pub mod folder_walker;
pub mod key_validator;
pub mod output_writer;
pub mod preflight;
pub mod rate_limiter;
