// src/github/mod.rs
// =============================================================================
// This module talks to the GitHub (Enterprise) repository search API.
//
// Submodules:
// - client: one HTTP request per search page, plus Link header parsing
// - search: walks every page of a search and collects the repositories
//
// The two are joined by the `RepositorySearch` trait so the paginator can be
// driven by an in-memory fake in tests.
// =============================================================================

mod client;
mod search;

pub use client::GitHubClient;
pub use search::{search_all, RepositorySearch, SearchError, SearchPage};

#[cfg(test)]
pub(crate) use search::tests::{repo, FakeSearch};

use serde::Deserialize;

// One item of a repository search result.
//
// Only `git_url` is used by the fetcher; the rest is kept for logging.
// Unknown fields in the JSON are ignored by serde.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    /// Unique id assigned by the API
    pub id: u64,
    /// "owner/name"
    #[serde(default)]
    pub full_name: String,
    /// git:// clone URL, absent on some Enterprise setups
    #[serde(default)]
    pub git_url: Option<String>,
}
