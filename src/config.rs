// src/config.rs
// =============================================================================
// Process-wide configuration, built exactly once at startup.
//
// `Config` is created from the parsed CLI, wrapped in an Arc by the caller,
// and handed to every component. Nothing mutates it afterwards.
//
// Validation happens here rather than in clap so that a missing token or
// URL produces exit status 1 (see main.rs).
// =============================================================================

use crate::cli::Cli;
use std::time::Duration;
use thiserror::Error;
use url::Url;

// The public GitHub API host; every other host is treated as Enterprise
const PUBLIC_API_HOST: &str = "api.github.com";

// Path suffix of the REST API on a GitHub Enterprise instance
const ENTERPRISE_API_PATH: &str = "api/v3/";

// Largest page size the search API accepts
const MAX_PER_PAGE: u32 = 100;

// One year; anything longer overflows timer arithmetic long before it is useful
const MAX_REFRESH_MINUTES: u64 = 365 * 24 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// Address godoc listens on
    pub listen_addr: String,
    /// API access token
    pub token: String,
    /// Normalised REST API root, always ending in '/'
    pub api_base: Url,
    /// Time between two scheduled refreshes
    pub refresh_interval: Duration,
    /// Repository search query
    pub query: String,
    /// Search page size
    pub per_page: u32,
    /// Retrieval tool (`go`)
    pub go_bin: String,
    /// Documentation server (`godoc`)
    pub godoc_bin: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("A github access token is required")]
    MissingToken,

    #[error("The Github Enterprise URL is required")]
    MissingUrl,

    #[error("Invalid Github URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("The Github URL must use http or https, got '{url}'")]
    UnsupportedScheme { url: String },

    #[error("--refresh-minutes must be at least 1")]
    ZeroRefreshInterval,

    #[error("--refresh-minutes must be at most 525600 (one year), got {0}")]
    RefreshIntervalTooLarge(u64),

    #[error("--per-page must be between 1 and 100, got {0}")]
    PerPageOutOfRange(u32),
}

impl Config {
    /// Validate the CLI values and build the immutable configuration.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let token = cli
            .gh_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let url = cli
            .gh_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingUrl)?;

        if cli.refresh_minutes == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }

        let refresh_secs = cli
            .refresh_minutes
            .checked_mul(60)
            .filter(|_| cli.refresh_minutes <= MAX_REFRESH_MINUTES)
            .ok_or(ConfigError::RefreshIntervalTooLarge(cli.refresh_minutes))?;

        if cli.per_page == 0 || cli.per_page > MAX_PER_PAGE {
            return Err(ConfigError::PerPageOutOfRange(cli.per_page));
        }

        Ok(Self {
            listen_addr: cli.http.clone(),
            token: token.to_string(),
            api_base: normalize_api_base(url)?,
            refresh_interval: Duration::from_secs(refresh_secs),
            query: cli.query.clone(),
            per_page: cli.per_page,
            go_bin: cli.go_bin.clone(),
            godoc_bin: cli.godoc_bin.clone(),
        })
    }
}

#[cfg(test)]
impl Config {
    pub(crate) fn for_tests() -> Self {
        Self {
            listen_addr: ":6060".to_string(),
            token: "t0k3n".to_string(),
            api_base: Url::parse("https://ghe.example.com/api/v3/").unwrap(),
            refresh_interval: Duration::from_secs(3600),
            query: "language:go".to_string(),
            per_page: 10,
            go_bin: "go".to_string(),
            godoc_bin: "godoc".to_string(),
        }
    }
}

// Turns a user-supplied instance URL into the REST API root.
//
//   https://ghe.example.com          -> https://ghe.example.com/api/v3/
//   https://ghe.example.com/api/v3   -> https://ghe.example.com/api/v3/
//   https://api.github.com           -> https://api.github.com/
pub fn normalize_api_base(raw: &str) -> Result<Url, ConfigError> {
    let mut base = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;

    if !matches!(base.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme {
            url: raw.to_string(),
        });
    }

    // Query and fragment have no meaning on an API root
    base.set_query(None);
    base.set_fragment(None);

    let mut path = base.path().to_string();
    if !path.ends_with('/') {
        path.push('/');
    }
    if base.host_str() != Some(PUBLIC_API_HOST) && !path.ends_with(ENTERPRISE_API_PATH) {
        path.push_str(ENTERPRISE_API_PATH);
    }
    base.set_path(&path);

    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["ghe-godoc"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn valid_cli() -> Cli {
        cli(&[
            "--gh-token",
            "t0k3n",
            "--gh-url",
            "https://ghe.example.com",
            "--http",
            ":6060",
            "--refresh-minutes",
            "60",
        ])
    }

    #[test]
    fn test_missing_token() {
        let mut c = valid_cli();
        c.gh_token = None;
        assert_eq!(Config::from_cli(&c).unwrap_err(), ConfigError::MissingToken);
    }

    #[test]
    fn test_blank_token_counts_as_missing() {
        let mut c = valid_cli();
        c.gh_token = Some("   ".to_string());
        assert_eq!(Config::from_cli(&c).unwrap_err(), ConfigError::MissingToken);
    }

    #[test]
    fn test_missing_url() {
        let mut c = valid_cli();
        c.gh_url = None;
        assert_eq!(Config::from_cli(&c).unwrap_err(), ConfigError::MissingUrl);
    }

    #[test]
    fn test_valid_config() {
        let config = Config::from_cli(&valid_cli()).unwrap();
        assert_eq!(config.token, "t0k3n");
        assert_eq!(config.listen_addr, ":6060");
        assert_eq!(config.api_base.as_str(), "https://ghe.example.com/api/v3/");
        assert_eq!(config.refresh_interval, Duration::from_secs(3600));
        assert_eq!(config.query, "language:go");
        assert_eq!(config.per_page, 10);
    }

    #[test]
    fn test_zero_refresh_interval_rejected() {
        let mut c = valid_cli();
        c.refresh_minutes = 0;
        assert_eq!(
            Config::from_cli(&c).unwrap_err(),
            ConfigError::ZeroRefreshInterval
        );
    }

    #[test]
    fn test_huge_refresh_interval_rejected() {
        let mut c = valid_cli();
        let too_large = [
            MAX_REFRESH_MINUTES + 1,
            200_000_000_000_000_000,
            400_000_000_000_000_000,
            u64::MAX,
        ];
        for minutes in too_large {
            c.refresh_minutes = minutes;
            assert_eq!(
                Config::from_cli(&c).unwrap_err(),
                ConfigError::RefreshIntervalTooLarge(minutes)
            );
        }
    }

    #[test]
    fn test_longest_refresh_interval_fits_a_timer() {
        let mut c = valid_cli();
        c.refresh_minutes = MAX_REFRESH_MINUTES;
        let config = Config::from_cli(&c).unwrap();
        assert_eq!(config.refresh_interval, Duration::from_secs(MAX_REFRESH_MINUTES * 60));
        assert!(std::time::Instant::now()
            .checked_add(config.refresh_interval)
            .is_some());
    }

    #[test]
    fn test_per_page_bounds() {
        let mut c = valid_cli();
        c.per_page = 101;
        assert_eq!(
            Config::from_cli(&c).unwrap_err(),
            ConfigError::PerPageOutOfRange(101)
        );
        c.per_page = 100;
        assert!(Config::from_cli(&c).is_ok());
    }

    #[test]
    fn test_normalize_enterprise_root() {
        let base = normalize_api_base("https://ghe.example.com").unwrap();
        assert_eq!(base.as_str(), "https://ghe.example.com/api/v3/");
    }

    #[test]
    fn test_normalize_keeps_existing_api_path() {
        let base = normalize_api_base("https://ghe.example.com/api/v3").unwrap();
        assert_eq!(base.as_str(), "https://ghe.example.com/api/v3/");
    }

    #[test]
    fn test_normalize_public_github() {
        let base = normalize_api_base("https://api.github.com").unwrap();
        assert_eq!(base.as_str(), "https://api.github.com/");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(
            normalize_api_base("not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            normalize_api_base("git://ghe.example.com"),
            Err(ConfigError::UnsupportedScheme { .. })
        ));
    }
}
