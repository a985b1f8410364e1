// src/github/client.rs
// =============================================================================
// HTTP client for `GET /search/repositories`.
//
// One call = one page. Pagination state comes back through the `Link`
// response header, e.g.
//
//   <https://ghe.example.com/api/v3/search/repositories?q=language%3Ago&page=2>; rel="next",
//   <https://ghe.example.com/api/v3/search/repositories?q=language%3Ago&page=5>; rel="last"
//
// We only care about the `page` parameter of the rel="next" entry.
//
// No timeout and no retry: a hung request hangs the cycle, a failed one
// fails it.
// =============================================================================

use super::search::{RepositorySearch, SearchError, SearchPage};
use super::Repository;
use crate::config::Config;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, LINK};
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const ACCEPT_V3: &str = "application/vnd.github.v3+json";

// Body of a search response; `total_count` and `incomplete_results` are
// read for logging only
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    incomplete_results: bool,
    #[serde(default)]
    items: Vec<Repository>,
}

// Authenticated search client.
//
// reqwest::Client is an Arc internally, so cloning GitHubClient is cheap and
// both the startup refresh and the background task can share one.
// No Debug derive: it would print the token.
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    api_base: Url,
    token: String,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V3));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.clone(),
            token: config.token.clone(),
        })
    }

    fn search_url(&self, query: &str, page: Option<u32>, per_page: u32) -> Result<Url, SearchError> {
        let mut url = self
            .api_base
            .join("search/repositories")
            .map_err(|source| SearchError::BuildUrl { source })?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            pairs.append_pair("per_page", &per_page.to_string());
            if let Some(page) = page {
                pairs.append_pair("page", &page.to_string());
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl RepositorySearch for GitHubClient {
    async fn search_page(
        &self,
        query: &str,
        page: Option<u32>,
        per_page: u32,
    ) -> Result<SearchPage, SearchError> {
        let url = self.search_url(query, page, per_page)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|source| SearchError::RequestSend { source })?;

        let status = response.status();
        let next_page = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_next_page);

        let body = response
            .text()
            .await
            .map_err(|source| SearchError::ResponseRead { source })?;

        if !status.is_success() {
            return Err(SearchError::Status { status, body });
        }

        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|source| SearchError::Decode { source })?;

        if parsed.incomplete_results {
            warn!(
                total = parsed.total_count,
                "search API reported incomplete results"
            );
        }

        Ok(SearchPage {
            repositories: parsed.items,
            next_page,
        })
    }
}

// Extracts the page number of the rel="next" entry of a Link header.
//
// Returns None when there is no next entry or its URL has no usable `page`.
pub fn parse_next_page(link_header: &str) -> Option<u32> {
    link_header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        if !is_next {
            return None;
        }

        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        let url = Url::parse(target).ok()?;
        let page = url
            .query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse::<u32>().ok());
        page.filter(|p| *p > 0)
    })
}
