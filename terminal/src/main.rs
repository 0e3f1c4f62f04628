//! `skelly` command-line entry point.

use std::process::ExitCode;

use clap::Parser;
use lib_core::config::init_config;
use terminal::{commands, debug, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();
    let _log_guard = debug::init();

    let cli = Cli::parse();

    let config = match init_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match commands::run(cli.command, config).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(code = e.code(), error = %e, "Command failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
