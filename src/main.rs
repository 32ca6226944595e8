use crate::structs::cli::Cli;
use clap::Parser;
use crate::errors::{ErrorHandler, FlatGemResult};
use crate::workers::command_runner::CommandRunner;

mod structs;
mod services;
mod helpers;
mod enums;
mod constants;
mod logger;
mod config;
mod errors;
mod traits;
mod workers;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_target(false)
        .format_timestamp(None)
        .init();
}

/// Prints a failure once and maps the outcome to a process exit code.
fn exit_code(result: &FlatGemResult<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            ErrorHandler::handle_error(e);
            1
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut runner = CommandRunner::new(cli.config);
    let result = runner.run_command(cli.command).await;
    std::process::exit(exit_code(&result));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FlatGemError;

    #[test]
    fn failures_exit_non_zero() {
        assert_eq!(exit_code(&Ok(())), 0);
        assert_eq!(exit_code(&Err(FlatGemError::ProcessingIncomplete { failed: 1, total: 3 })), 1);
    }
}
