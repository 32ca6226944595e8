use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use crate::config::config_manager::ConfigManager;
use crate::config::constants::FALLBACK_MODELS;
use crate::enums::commands::Commands;
use crate::enums::key_status::KeyStatus;
use crate::errors::{FlatGemError, FlatGemResult};
use crate::services::ai_providers::gemini::GeminiProvider;
use crate::services::file_processor::FileProcessor;
use crate::services::key_validator::KeyValidator;
use crate::services::preflight::Preflight;
use crate::services::rate_limiter::ApiRateLimiter;
use crate::structs::config::config::Config;
use crate::structs::process_args::ProcessArgs;
use crate::structs::processing_job::ProcessingJob;
use crate::traits::ai_provider::AiProvider;

pub struct CommandRunner {
    config_manager: ConfigManager,
    start_time: Option<Instant>,
}

impl CommandRunner {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            config_manager: ConfigManager::new(config_path),
            start_time: None,
        }
    }

    pub async fn run_command(&mut self, command: Commands) -> FlatGemResult<()> {
        self.start_time = Some(Instant::now());

        let result = match command {
            Commands::Init { force } => self.init_command(force),
            Commands::Process(args) => self.process_command(args).await,
            Commands::Scan { input, output, recursive } => self.scan_command(input, output, recursive),
            Commands::Models { api_key } => self.models_command(api_key).await,
            Commands::Key { api_key } => self.key_command(&api_key).await,
            Commands::Validate => self.validate_command(),
        };

        if let Some(start) = self.start_time {
            log::info!("⏱️  Command completed in {:.2}s", start.elapsed().as_secs_f64());
        }

        result
    }

    fn init_command(&self, force: bool) -> FlatGemResult<()> {
        log::info!("🚀 Initializing flatgem configuration...");
        self.config_manager.create_sample_config(force)?;
        log::info!("📝 Edit the prompt and folders in the configuration file.");
        log::info!("🔑 Run 'flatgem key <API_KEY>' to store your Gemini API key.");
        Ok(())
    }

    fn load_config(&self) -> FlatGemResult<Config> {
        self.config_manager.load().inspect_err(|_| {
            log::error!("💡 Run 'flatgem init' to create a fresh configuration file.");
        })
    }

    async fn process_command(&self, args: ProcessArgs) -> FlatGemResult<()> {
        let mut config = self.load_config()?;
        let job = ProcessingJob::resolve(&config, &args)?;
        job.validate()?;

        let report = Preflight::scan(&job.input_dir, &job.output_dir, job.recursive, &job.exclude_patterns)?;
        report.print_summary();

        if report.files_found == 0 {
            log::info!("📭 Processing finished: No files to process.");
            return Ok(());
        }

        if report.has_warnings() && !args.yes && !Self::confirm("Continue with processing?")? {
            log::info!("⏭️ Cancelled.");
            return Ok(());
        }

        let api_key = ConfigManager::resolve_api_key(&config, args.api_key.as_deref())?;
        let rate_limiter = ApiRateLimiter::new(config.ai.rate_limit_per_minute);
        if rate_limiter.is_limited() {
            log::info!("🚦 Capped at {} requests per minute", config.ai.rate_limit_per_minute.unwrap_or_default());
        }
        let provider = GeminiProvider::new(&api_key, &config.ai, rate_limiter)?.with_model(&job.model);
        log::info!("🤖 Model: {}", provider.model());

        if args.save {
            Self::remember_settings(&mut config, &args, &job);
            self.config_manager.save(&config)?;
            log::info!("💾 Settings saved to {}", self.config_manager.path().display());
        }

        let stop_flag = Arc::new(AtomicBool::new(false));
        Self::install_stop_handler(Arc::clone(&stop_flag));

        let processor = FileProcessor::new(Arc::new(provider), job)
            .with_stop_flag(stop_flag)
            .with_spinner(true);
        let summary = processor.run().await?;
        summary.print_summary();

        if summary.errors.is_empty() {
            Ok(())
        } else {
            Err(FlatGemError::ProcessingIncomplete {
                failed: summary.errors.len(),
                total: summary.total,
            })
        }
    }

    fn remember_settings(config: &mut Config, args: &ProcessArgs, job: &ProcessingJob) {
        let processing = &mut config.processing;
        processing.input_dir = Some(job.input_dir.to_string_lossy().to_string());
        processing.output_dir = Some(job.output_dir.to_string_lossy().to_string());
        processing.output_extension = job.output_extension.clone();
        processing.delay_secs = job.delay.as_secs();
        processing.recursive = job.recursive;
        processing.thinking_mode = job.thinking_mode;
        processing.concurrency = job.concurrency;
        processing.max_retries = job.max_retries;

        match &args.prompt_file {
            Some(path) => {
                processing.prompt_file = Some(path.to_string_lossy().to_string());
                processing.prompt = None;
            }
            None if args.prompt.is_some() => {
                processing.prompt = Some(job.system_prompt.clone());
                processing.prompt_file = None;
            }
            None => {}
        }

        config.ai.model = job.model.clone();
    }

    fn install_stop_handler(stop_flag: Arc<AtomicBool>) {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("🛑 Stop requested, finishing the current file...");
                stop_flag.store(true, Ordering::SeqCst);
            }
        });
    }

    fn confirm(question: &str) -> FlatGemResult<bool> {
        print!("\n{question} [y/N]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    fn scan_command(&self, input: Option<PathBuf>, output: Option<PathBuf>, recursive: bool) -> FlatGemResult<()> {
        let config = self.load_config()?;
        let processing = &config.processing;

        let input = input
            .or_else(|| processing.input_dir.as_ref().map(PathBuf::from))
            .ok_or_else(|| FlatGemError::user_input_error("--input", "an input folder", "Pass --input or set processing.input_dir"))?;
        let output = output
            .or_else(|| processing.output_dir.as_ref().map(PathBuf::from))
            .unwrap_or_default();

        let report = Preflight::scan(&input, &output, recursive || processing.recursive, &processing.exclude_patterns)?;
        report.print_summary();
        Ok(())
    }

    async fn models_command(&self, api_key: Option<String>) -> FlatGemResult<()> {
        let config = self.load_config()?;
        let api_key = ConfigManager::resolve_api_key(&config, api_key.as_deref())?;
        let provider = GeminiProvider::new(&api_key, &config.ai, ApiRateLimiter::new(config.ai.rate_limit_per_minute))?;

        let models = Self::available_models(&provider).await;
        log::info!("🤖 Models supporting content generation ({}):", models.len());
        for model in &models {
            let marker = if *model == config.ai.model { " (configured)" } else { "" };
            log::info!("   • {model}{marker}");
        }

        Ok(())
    }

    /// The live model list, or a short built-in list when it cannot be fetched.
    async fn available_models(provider: &dyn AiProvider) -> Vec<String> {
        match provider.list_models().await {
            Ok(models) if !models.is_empty() => models,
            Ok(_) => FALLBACK_MODELS.iter().map(ToString::to_string).collect(),
            Err(e) => {
                log::warn!("⚠️ Could not fetch model list: {e}");
                FALLBACK_MODELS.iter().map(ToString::to_string).collect()
            }
        }
    }

    async fn key_command(&self, api_key: &str) -> FlatGemResult<()> {
        let mut config = self.load_config()?;

        log::info!("🔑 Checking API key...");
        let status = KeyValidator::check(api_key, &config.ai).await;
        log::info!("{}", status.message());

        match status {
            KeyStatus::Valid => {
                config.ai.api_key = Some(api_key.trim().to_string());
                self.config_manager.save(&config)?;
                log::info!("💾 API key saved to {}", self.config_manager.path().display());
                Ok(())
            }
            KeyStatus::Invalid(reason) => Err(FlatGemError::validation_error(
                "api_key",
                "<hidden>",
                "must be accepted by the Gemini API",
                Some(&reason),
            )),
            KeyStatus::Unreachable(reason) => Err(FlatGemError::NetworkError {
                operation: "API key check".to_string(),
                url: None,
                status_code: None,
                reason,
            }),
        }
    }

    fn validate_command(&self) -> FlatGemResult<()> {
        log::info!("🔍 Validating {}...", self.config_manager.path().display());
        let config = self.load_config()?;

        match ConfigManager::validate_config(&config) {
            Ok(()) => {
                log::info!("✅ Configuration is valid!");
                if ConfigManager::resolve_api_key(&config, None).is_err() {
                    log::warn!("⚠️ No API key configured yet. Run 'flatgem key <API_KEY>'.");
                }
                Ok(())
            }
            Err(errors) => {
                log::error!("❌ Configuration has {} problem(s):", errors.len());
                for (i, error) in errors.iter().enumerate() {
                    log::error!("  {}. {}", i + 1, error);
                }
                Err(FlatGemError::config_error(
                    &format!("{} configuration problem(s)", errors.len()),
                    None,
                    Some("Fix the listed settings and run 'flatgem validate' again"),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::ai_provider_error::AiProviderError;
    use crate::traits::ai_provider::MockAiProvider;
    use std::time::Duration;

    #[tokio::test]
    async fn model_list_falls_back_when_unavailable() {
        let mut provider = MockAiProvider::new();
        provider
            .expect_list_models()
            .returning(|| Err(AiProviderError::NetworkError("offline".to_string())));

        let models = CommandRunner::available_models(&provider).await;
        assert_eq!(models, vec!["gemini-1.5-pro-latest", "gemini-2.5-flash"]);
    }

    #[test]
    fn remembered_settings_replace_previous_prompt_source() {
        let mut config = Config::default();
        config.processing.prompt_file = Some("/old/prompt.txt".to_string());

        let args = ProcessArgs {
            prompt: Some("New prompt".to_string()),
            ..Default::default()
        };
        let job = ProcessingJob {
            input_dir: PathBuf::from("/in"),
            output_dir: PathBuf::from("/out"),
            system_prompt: "New prompt".to_string(),
            model: "gemini-2.0-flash".to_string(),
            output_extension: ".json".to_string(),
            delay: Duration::from_secs(4),
            recursive: true,
            thinking_mode: false,
            concurrency: 2,
            max_retries: 1,
            retry_backoff_secs: 5,
            exclude_patterns: vec![],
        };

        CommandRunner::remember_settings(&mut config, &args, &job);

        assert_eq!(config.processing.prompt.as_deref(), Some("New prompt"));
        assert!(config.processing.prompt_file.is_none());
        assert_eq!(config.processing.delay_secs, 4);
        assert_eq!(config.processing.input_dir.as_deref(), Some("/in"));
        assert_eq!(config.ai.model, "gemini-2.0-flash");
    }

    #[test]
    fn validate_reports_broken_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[processing]\nconcurrency = 0\n").unwrap();

        let runner = CommandRunner::new(Some(path));
        assert!(runner.validate_command().is_err());
    }
}
