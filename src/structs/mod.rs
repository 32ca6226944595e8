pub mod ai;
pub mod cli;
pub mod config;
pub mod file_entry;
pub mod process_args;
pub mod processing_job;
pub mod processing_summary;
pub mod prompt_payload;
pub mod scan_report;
