pub mod ai_config;
pub mod config;
pub mod processing_config;
