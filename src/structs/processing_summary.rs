#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total: usize,
    pub succeeded: usize,
    pub errors: Vec<String>,
    pub stopped: bool,
}

impl ProcessingSummary {
    pub fn message(&self) -> String {
        if self.stopped {
            return "Processing stopped by user.".to_string();
        }

        if self.total == 0 {
            return "Processing finished: No files to process.".to_string();
        }

        if self.errors.is_empty() {
            format!("Successfully processed {} of {} files.", self.succeeded, self.total)
        } else {
            format!(
                "Processing finished with issues. Processed: {} | Failed: {}",
                self.succeeded,
                self.errors.len()
            )
        }
    }

    pub fn print_summary(&self) {
        log::info!("\n{}", "=".repeat(60));
        log::info!("📊 {}", self.message());
        log::info!("{}", "=".repeat(60));

        if !self.errors.is_empty() {
            log::error!("❌ Errors ({}):", self.errors.len());
            for (i, error) in self.errors.iter().enumerate() {
                log::error!("  {}. {}", i + 1, error);
            }
        }
    }
}
