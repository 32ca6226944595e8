use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use futures::stream::{self, StreamExt};
use tokio::time::sleep;
use crate::config::constants::retry_backoff;
use crate::enums::ai_provider_error::AiProviderError;
use crate::enums::file_outcome::FileOutcome;
use crate::errors::FlatGemResult;
use crate::helpers::prompt_generator;
use crate::logger::animated_logger::AnimatedLogger;
use crate::services::folder_walker::FolderWalker;
use crate::services::output_writer::OutputWriter;
use crate::services::rate_limiter::RequestPacer;
use crate::structs::file_entry::FileEntry;
use crate::structs::processing_job::ProcessingJob;
use crate::structs::processing_summary::ProcessingSummary;
use crate::structs::prompt_payload::PromptPayload;
use crate::traits::ai_provider::AiProvider;

const STOP_POLL_INTERVAL_MS: u64 = 250;

/// Runs one batch: every file under the input folder goes through the provider once.
pub struct FileProcessor {
    provider: Arc<dyn AiProvider>,
    job: ProcessingJob,
    system_prompt: String,
    writer: OutputWriter,
    stop_flag: Arc<AtomicBool>,
    show_spinner: bool,
}

impl FileProcessor {
    pub fn new(provider: Arc<dyn AiProvider>, job: ProcessingJob) -> Self {
        let system_prompt = prompt_generator::compose_system_prompt(&job.system_prompt, job.thinking_mode);
        let writer = OutputWriter::new(&job.output_dir, &job.output_extension);

        Self {
            provider,
            job,
            system_prompt,
            writer,
            stop_flag: Arc::new(AtomicBool::new(false)),
            show_spinner: false,
        }
    }

    pub fn with_stop_flag(mut self, stop_flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = stop_flag;
        self
    }

    pub const fn with_spinner(mut self, show_spinner: bool) -> Self {
        self.show_spinner = show_spinner;
        self
    }

    fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::SeqCst)
    }

    pub async fn run(&self) -> FlatGemResult<ProcessingSummary> {
        let files = FolderWalker::new(&self.job.input_dir, self.job.recursive, self.job.exclude_patterns.clone())
            .collect_files()?;

        if files.is_empty() {
            log::info!("📭 No files to process in {}", self.job.input_dir.display());
            return Ok(ProcessingSummary::default());
        }

        log::info!("🚀 Processing {} files with model {}", files.len(), self.job.model);
        if self.job.thinking_mode {
            log::info!("🧠 Thinking mode enabled");
        }

        if self.job.concurrency > 1 {
            Ok(self.run_fan_out(&files).await)
        } else {
            Ok(self.run_sequential(&files).await)
        }
    }

    async fn run_sequential(&self, files: &[FileEntry]) -> ProcessingSummary {
        let total = files.len();
        let mut summary = ProcessingSummary { total, ..Default::default() };

        for (index, file) in files.iter().enumerate() {
            if self.is_stopped() {
                summary.stopped = true;
                break;
            }

            let outcome = self.process_file(index + 1, total, file, None).await;
            let issued_request = outcome.issued_request();
            Self::record(&mut summary, &outcome);

            if issued_request && index + 1 < total && !self.job.delay.is_zero() {
                self.pause(self.job.delay).await;
            }
        }

        summary
    }

    async fn run_fan_out(&self, files: &[FileEntry]) -> ProcessingSummary {
        let total = files.len();
        let pacer = RequestPacer::new(self.job.delay);
        if pacer.is_enabled() {
            log::info!(
                "🔀 Up to {} requests in flight, started at least {}s apart",
                self.job.concurrency,
                pacer.delay().as_secs_f64()
            );
        } else {
            log::info!("🔀 Up to {} requests in flight, no pacing", self.job.concurrency);
        }

        let pacer = &pacer;
        let outcomes: Vec<FileOutcome> = stream::iter(files.iter().enumerate())
            .map(|(index, file)| self.process_file(index + 1, total, file, Some(pacer)))
            .buffer_unordered(self.job.concurrency)
            .collect()
            .await;

        let mut summary = ProcessingSummary { total, ..Default::default() };
        for outcome in &outcomes {
            Self::record(&mut summary, outcome);
        }

        summary
    }

    fn record(summary: &mut ProcessingSummary, outcome: &FileOutcome) {
        if matches!(outcome, FileOutcome::NotStarted) {
            summary.stopped = true;
            return;
        }

        match outcome.error_message() {
            Some(error) => summary.errors.push(error.to_string()),
            None => summary.succeeded += 1,
        }
    }

    async fn process_file(&self, position: usize, total: usize, file: &FileEntry, pacer: Option<&RequestPacer>) -> FileOutcome {
        if let Some(pacer) = pacer {
            if !self.wait_for_turn(pacer).await {
                return FileOutcome::NotStarted;
            }
        }

        let name = file.display_name();
        log::info!("📄 [{position}/{total}] {name}");

        let content = match tokio::fs::read_to_string(&file.path).await {
            Ok(content) => content,
            Err(e) => {
                let error = format!("File: {name} | A file system or other critical error occurred: {e}");
                log::error!("❌ {error}");
                return FileOutcome::ReadFailed(error);
            }
        };

        let payload = prompt_generator::generate_payload(&self.system_prompt, content);

        let response = match self.generate_with_retries(&name, &payload, pacer).await {
            Ok(response) => response,
            Err(e) => {
                let error = format!("File: {name} | {e}");
                log::error!("❌ API error: {error}");
                return FileOutcome::RequestFailed(error);
            }
        };

        match self.writer.write(&file.relative_path, &response) {
            Ok(target) => {
                log::info!("💾 Saved {}", target.display());
                FileOutcome::Written(target)
            }
            Err(e) => {
                let error = format!("File: {name} | {e}");
                log::error!("❌ {error}");
                FileOutcome::WriteFailed(error)
            }
        }
    }

    async fn generate_with_retries(
        &self,
        name: &str,
        payload: &PromptPayload,
        pacer: Option<&RequestPacer>,
    ) -> Result<String, AiProviderError> {
        let mut attempt = 0;

        loop {
            match self.provider.generate_content(payload).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < self.job.max_retries && !self.is_stopped() => {
                    let backoff = retry_backoff(self.job.retry_backoff_secs, attempt);
                    attempt += 1;
                    log::warn!(
                        "🔁 {name}: {e}. Retry {attempt}/{} in {}s",
                        self.job.max_retries,
                        backoff.as_secs()
                    );
                    self.sleep_unless_stopped(backoff).await;

                    let resumed = match pacer {
                        Some(pacer) => self.wait_for_turn(pacer).await,
                        None => !self.is_stopped(),
                    };
                    if !resumed {
                        return Err(e);
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn pause(&self, delay: Duration) {
        if self.show_spinner {
            let mut logger = AnimatedLogger::new(format!("⏳ Waiting {}s before the next file", delay.as_secs()));
            logger.start();
            self.sleep_unless_stopped(delay).await;
            logger.stop("Resuming").await;
        } else {
            log::debug!("Waiting {}s before the next file", delay.as_secs_f64());
            self.sleep_unless_stopped(delay).await;
        }
    }

    /// Waits for the pacer's next permit. Returns false if a stop arrives first.
    async fn wait_for_turn(&self, pacer: &RequestPacer) -> bool {
        if self.is_stopped() {
            return false;
        }

        tokio::select! {
            () = pacer.wait_turn() => !self.is_stopped(),
            () = self.stop_requested() => false,
        }
    }

    /// Sleeps for `duration`, waking early once the stop flag is set.
    async fn sleep_unless_stopped(&self, duration: Duration) {
        tokio::select! {
            () = sleep(duration) => {}
            () = self.stop_requested() => {}
        }
    }

    async fn stop_requested(&self) {
        let poll = Duration::from_millis(STOP_POLL_INTERVAL_MS);
        while !self.is_stopped() {
            sleep(poll).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ai_provider::MockAiProvider;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use tokio::time::Instant;

    fn job(input: &Path, output: &Path) -> ProcessingJob {
        ProcessingJob {
            input_dir: input.to_path_buf(),
            output_dir: output.to_path_buf(),
            system_prompt: "Shout it".to_string(),
            model: "gemini-2.5-flash".to_string(),
            output_extension: String::new(),
            delay: Duration::ZERO,
            recursive: true,
            thinking_mode: false,
            concurrency: 1,
            max_retries: 2,
            retry_backoff_secs: 0,
            exclude_patterns: vec![],
        }
    }

    fn uppercase_provider() -> MockAiProvider {
        let mut provider = MockAiProvider::new();
        provider
            .expect_generate_content()
            .returning(|payload: &PromptPayload| Ok(payload.user_content.to_uppercase()));
        provider
    }

    fn input_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.txt"), "bravo").unwrap();
        dir
    }

    #[tokio::test]
    async fn mirrors_input_tree_into_output() {
        let input = input_tree();
        let output = TempDir::new().unwrap();
        let mut job = job(input.path(), output.path());
        job.output_extension = "md".to_string();

        let processor = FileProcessor::new(Arc::new(uppercase_provider()), job);
        let summary = processor.run().await.unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 2);
        assert!(summary.errors.is_empty());
        assert_eq!(fs::read_to_string(output.path().join("a.md")).unwrap(), "ALPHA");
        assert_eq!(fs::read_to_string(output.path().join("sub/b.md")).unwrap(), "BRAVO");
    }

    #[tokio::test]
    async fn system_prompt_is_sent_with_every_file() {
        let input = input_tree();
        let output = TempDir::new().unwrap();
        let mut job = job(input.path(), output.path());
        job.thinking_mode = true;

        let mut provider = MockAiProvider::new();
        provider
            .expect_generate_content()
            .withf(|payload: &PromptPayload| {
                payload.system_instruction.starts_with("Before you begin") && payload.system_instruction.ends_with("Shout it")
            })
            .times(2)
            .returning(|_| Ok("ok".to_string()));

        let summary = FileProcessor::new(Arc::new(provider), job).run().await.unwrap();
        assert_eq!(summary.succeeded, 2);
    }

    #[tokio::test]
    async fn failed_file_is_logged_and_the_rest_continue() {
        let input = input_tree();
        let output = TempDir::new().unwrap();

        let mut provider = MockAiProvider::new();
        provider
            .expect_generate_content()
            .returning(|payload: &PromptPayload| {
                if payload.user_content == "alpha" {
                    Err(AiProviderError::Blocked("SAFETY".to_string()))
                } else {
                    Ok("fine".to_string())
                }
            });

        let summary = FileProcessor::new(Arc::new(provider), job(input.path(), output.path()))
            .run()
            .await
            .unwrap();

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].starts_with("File: a.txt |"));
        assert!(!output.path().join("a.txt").exists());
        assert!(output.path().join("sub/b.txt").exists());
    }

    #[tokio::test]
    async fn non_utf8_file_is_skipped() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("image.bin"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        fs::write(input.path().join("notes.txt"), "notes").unwrap();

        let summary = FileProcessor::new(Arc::new(uppercase_provider()), job(input.path(), output.path()))
            .run()
            .await
            .unwrap();

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].contains("image.bin"));
    }

    #[tokio::test]
    async fn retryable_errors_are_retried() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("a.txt"), "alpha").unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut provider = MockAiProvider::new();
        provider.expect_generate_content().returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(AiProviderError::RateLimited("quota".to_string()))
            } else {
                Ok("done".to_string())
            }
        });

        let summary = FileProcessor::new(Arc::new(provider), job(input.path(), output.path()))
            .run()
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(summary.succeeded, 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("a.txt"), "alpha").unwrap();

        let mut provider = MockAiProvider::new();
        provider
            .expect_generate_content()
            .times(3)
            .returning(|_| Err(AiProviderError::ServerError { status: 503, message: "busy".to_string() }));

        let summary = FileProcessor::new(Arc::new(provider), job(input.path(), output.path()))
            .run()
            .await
            .unwrap();

        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.errors.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_applied_between_files_but_not_after_the_last() {
        let input = input_tree();
        let output = TempDir::new().unwrap();
        let mut job = job(input.path(), output.path());
        job.delay = Duration::from_secs(10);

        let start = Instant::now();
        let summary = FileProcessor::new(Arc::new(uppercase_provider()), job).run().await.unwrap();

        let elapsed = start.elapsed();

        assert_eq!(summary.succeeded, 2);
        assert!(elapsed >= Duration::from_secs(10));
        assert!(elapsed < Duration::from_secs(11));
    }

    #[tokio::test(start_paused = true)]
    async fn unreadable_file_does_not_trigger_the_delay() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("a.txt"), "alpha").unwrap();
        fs::write(input.path().join("b.bin"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        fs::write(input.path().join("c.txt"), "charlie").unwrap();
        let mut job = job(input.path(), output.path());
        job.delay = Duration::from_secs(10);

        let start = Instant::now();
        let summary = FileProcessor::new(Arc::new(uppercase_provider()), job).run().await.unwrap();
        let elapsed = start.elapsed();

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.errors.len(), 1);
        assert!(elapsed >= Duration::from_secs(10));
        assert!(elapsed < Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cuts_the_pacing_sleep_short() {
        let input = input_tree();
        let output = TempDir::new().unwrap();
        let mut job = job(input.path(), output.path());
        job.delay = Duration::from_secs(300);

        let stop = Arc::new(AtomicBool::new(false));
        let trigger = Arc::clone(&stop);
        let mut provider = MockAiProvider::new();
        provider.expect_generate_content().times(1).returning(move |_| {
            let trigger = Arc::clone(&trigger);
            tokio::spawn(async move {
                sleep(Duration::from_secs(5)).await;
                trigger.store(true, Ordering::SeqCst);
            });
            Ok("first".to_string())
        });

        let start = Instant::now();
        let summary = FileProcessor::new(Arc::new(provider), job)
            .with_stop_flag(stop)
            .run()
            .await
            .unwrap();

        assert!(summary.stopped);
        assert_eq!(summary.succeeded, 1);
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn fan_out_spaces_request_starts() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        for i in 0..3 {
            fs::write(input.path().join(format!("f{i}.txt")), format!("file {i}")).unwrap();
        }
        let mut job = job(input.path(), output.path());
        job.concurrency = 3;
        job.delay = Duration::from_millis(150);

        let starts = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&starts);
        let mut provider = MockAiProvider::new();
        provider.expect_generate_content().times(3).returning(move |_| {
            recorder.lock().unwrap().push(std::time::Instant::now());
            Ok("ok".to_string())
        });

        let summary = FileProcessor::new(Arc::new(provider), job).run().await.unwrap();
        assert_eq!(summary.succeeded, 3);

        let mut starts = starts.lock().unwrap().clone();
        starts.sort();
        assert!(starts[2].duration_since(starts[0]) >= Duration::from_millis(250));
    }

    #[tokio::test]
    async fn stop_during_fan_out_sends_no_more_requests() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        for i in 0..6 {
            fs::write(input.path().join(format!("f{i}.txt")), format!("file {i}")).unwrap();
        }
        let mut job = job(input.path(), output.path());
        job.concurrency = 3;
        job.delay = Duration::from_secs(1);

        let stop = Arc::new(AtomicBool::new(false));
        let trigger = Arc::clone(&stop);
        let mut provider = MockAiProvider::new();
        provider.expect_generate_content().times(1).returning(move |_| {
            trigger.store(true, Ordering::SeqCst);
            Ok("first".to_string())
        });

        let start = std::time::Instant::now();
        let summary = FileProcessor::new(Arc::new(provider), job)
            .with_stop_flag(stop)
            .run()
            .await
            .unwrap();

        assert!(summary.stopped);
        assert_eq!(summary.succeeded, 1);
        assert!(summary.errors.is_empty());
        assert!(output.path().join("f0.txt").exists());
        assert!(start.elapsed() < Duration::from_millis(900));
    }

    #[tokio::test]
    async fn fan_out_processes_every_file() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        for i in 0..6 {
            fs::write(input.path().join(format!("f{i}.txt")), format!("file {i}")).unwrap();
        }
        let mut job = job(input.path(), output.path());
        job.concurrency = 3;

        let summary = FileProcessor::new(Arc::new(uppercase_provider()), job).run().await.unwrap();

        assert_eq!(summary.succeeded, 6);
        assert_eq!(fs::read_to_string(output.path().join("f4.txt")).unwrap(), "FILE 4");
    }

    #[tokio::test]
    async fn stop_flag_prevents_further_files() {
        let input = input_tree();
        let output = TempDir::new().unwrap();
        let stop = Arc::new(AtomicBool::new(false));
        let trigger = Arc::clone(&stop);

        let mut provider = MockAiProvider::new();
        provider.expect_generate_content().times(1).returning(move |_| {
            trigger.store(true, Ordering::SeqCst);
            Ok("first".to_string())
        });

        let summary = FileProcessor::new(Arc::new(provider), job(input.path(), output.path()))
            .with_stop_flag(stop)
            .run()
            .await
            .unwrap();

        assert!(summary.stopped);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.message(), "Processing stopped by user.");
    }

    #[tokio::test]
    async fn empty_input_reports_nothing_to_do() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let mut provider = MockAiProvider::new();
        provider.expect_generate_content().never();

        let summary = FileProcessor::new(Arc::new(provider), job(input.path(), output.path()))
            .run()
            .await
            .unwrap();

        assert_eq!(summary.total, 0);
        tokio_test::assert_ok!(fs::read_dir(output.path()));
    }
}
