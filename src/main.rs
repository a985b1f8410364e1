// src/main.rs
// =============================================================================
// Entry point of ghe-godoc.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Validate configuration (exit 1 with usage text if something is missing)
// 4. Build the GitHub client and hand everything to app::run
// 5. Exit with godoc's exit code
// =============================================================================

mod app;      // src/app.rs - startup sequence
mod cli;      // src/cli.rs - command-line parsing
mod config;   // src/config.rs - validated, immutable settings
mod docs;     // src/docs.rs - runs godoc
mod fetch;    // src/fetch/ - `go get` for each repository
mod github;   // src/github/ - repository search API
mod logging;  // src/logging.rs - tracing subscriber
mod refresh;  // src/refresh/ - initial and periodic refreshes

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::Cli;
use config::Config;
use fetch::TokioRunner;
use github::GitHubClient;
use std::sync::Arc;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.log_level) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<i32> {
    // Missing token/URL: message + usage, status 1, no network traffic
    let config = match Config::from_cli(&cli) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            println!("{}", e);
            Cli::command().print_help()?;
            return Ok(1);
        }
    };

    let client = GitHubClient::new(&config).context("failed to initialize the Github client")?;

    app::run(config, Arc::new(client), Arc::new(TokioRunner)).await
}
