// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The flag names match what people already pass to the tool:
//   --http, --gh-token, --gh-url, --refresh-minutes
//
// The token and the URL are required, but they are declared as Option here.
// If clap enforced them it would exit with status 2; we want status 1 and a
// short message, so `config::Config::from_cli` checks them instead.
//
// Every flag can also come from the environment (the `env` feature of clap),
// which keeps the token out of `ps` output.
// =============================================================================

use clap::Parser;

// The whole CLI: one command, no subcommands
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ghe-godoc",
    version,
    about = "Mirror Go repositories from GitHub Enterprise and serve their documentation",
    long_about = "ghe-godoc searches a GitHub (Enterprise) instance for Go repositories, \
                  downloads each one with `go get -d`, and serves the result with godoc. \
                  The search is repeated on a timer so new repositories show up automatically."
)]
pub struct Cli {
    /// HTTP service address handed to godoc (e.g., ':6060')
    #[arg(long = "http", env = "GODOC_HTTP", default_value = ":6060")]
    pub http: String,

    /// A GitHub access token
    #[arg(long = "gh-token", env = "GH_TOKEN", hide_env_values = true)]
    pub gh_token: Option<String>,

    /// The URL of the GitHub Enterprise instance (or https://api.github.com)
    #[arg(long = "gh-url", env = "GH_URL")]
    pub gh_url: Option<String>,

    /// The number of minutes to wait in between each refresh
    #[arg(long = "refresh-minutes", env = "GODOC_REFRESH_MINUTES", default_value_t = 60)]
    pub refresh_minutes: u64,

    /// Repository search query
    #[arg(long, default_value = "language:go")]
    pub query: String,

    /// Number of search results requested per page (1-100)
    #[arg(long = "per-page", default_value_t = 10)]
    pub per_page: u32,

    /// Program used to download repositories
    #[arg(long = "go-bin", default_value = "go")]
    pub go_bin: String,

    /// Program used to serve documentation
    #[arg(long = "godoc-bin", default_value = "godoc")]
    pub godoc_bin: String,

    /// Default log filter; RUST_LOG takes precedence when set
    #[arg(long = "log-level", default_value = "info")]
    pub log_level: String,
}
