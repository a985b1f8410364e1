// src/github/search.rs
// =============================================================================
// Paginated repository search.
//
// How it works:
// 1. Ask for the first page (no page number, the API's default)
// 2. Append the repositories to an accumulator
// 3. If the response names a next page, ask for it and repeat
// 4. Stop when there is no next page
//
// Any failing request aborts the whole walk. The repositories gathered so far
// are dropped: the caller gets the error and nothing else.
// =============================================================================

use super::Repository;
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

// One page of search results
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub repositories: Vec<Repository>,
    /// Page number to request next, None on the last page
    pub next_page: Option<u32>,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("failed to build search URL: {source}")]
    BuildUrl {
        #[source]
        source: url::ParseError,
    },

    #[error("search request failed: {source}")]
    RequestSend {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read search response: {source}")]
    ResponseRead {
        #[source]
        source: reqwest::Error,
    },

    #[error("search API returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode search response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
}

// Anything that can return a single page of repository search results.
//
// `page` is None for the first request.
#[async_trait]
pub trait RepositorySearch: Send + Sync {
    async fn search_page(
        &self,
        query: &str,
        page: Option<u32>,
        per_page: u32,
    ) -> Result<SearchPage, SearchError>;
}

// Collects every repository matching `query`, across all result pages,
// in the order the API returned them.
pub async fn search_all(
    search: &dyn RepositorySearch,
    query: &str,
    per_page: u32,
) -> Result<Vec<Repository>, SearchError> {
    let mut all_repos = Vec::new();
    let mut page = None;

    loop {
        let result = search.search_page(query, page, per_page).await?;
        debug!(
            page = page.unwrap_or(1),
            count = result.repositories.len(),
            "received search page"
        );

        all_repos.extend(result.repositories);

        match result.next_page {
            Some(next) => page = Some(next),
            None => break,
        }
    }

    Ok(all_repos)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serves `total` repositories in pages of `per_page`, optionally failing
    // on one page number (1-based).
    pub(crate) struct FakeSearch {
        pub total: u64,
        pub fail_on_page: Option<u32>,
        pub requested: Mutex<Vec<Option<u32>>>,
    }

    impl FakeSearch {
        pub(crate) fn new(total: u64) -> Self {
            Self {
                total,
                fail_on_page: None,
                requested: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing_on(total: u64, page: u32) -> Self {
            Self {
                fail_on_page: Some(page),
                ..Self::new(total)
            }
        }

        pub(crate) fn requests(&self) -> usize {
            self.requested.lock().unwrap().len()
        }
    }

    pub(crate) fn repo(id: u64, git_url: Option<&str>) -> Repository {
        Repository {
            id,
            full_name: format!("org/repo{}", id),
            git_url: git_url.map(str::to_string),
        }
    }

    #[async_trait]
    impl RepositorySearch for FakeSearch {
        async fn search_page(
            &self,
            _query: &str,
            page: Option<u32>,
            per_page: u32,
        ) -> Result<SearchPage, SearchError> {
            self.requested.lock().unwrap().push(page);
            let number = page.unwrap_or(1);

            if self.fail_on_page == Some(number) {
                return Err(SearchError::Status {
                    status: reqwest::StatusCode::BAD_GATEWAY,
                    body: format!("page {} unavailable", number),
                });
            }

            let start = u64::from(number - 1) * u64::from(per_page);
            let end = (start + u64::from(per_page)).min(self.total);
            let repositories = (start..end)
                .map(|id| repo(id, Some(&format!("git://ghe.example.com/org/repo{}.git", id))))
                .collect();
            let next_page = (end < self.total).then_some(number + 1);

            Ok(SearchPage {
                repositories,
                next_page,
            })
        }
    }

    #[tokio::test]
    async fn test_collects_every_page() {
        for (total, per_page) in [(0, 10), (1, 10), (10, 10), (11, 10), (95, 10), (7, 3)] {
            let search = FakeSearch::new(total);
            let repos = search_all(&search, "language:go", per_page).await.unwrap();

            assert_eq!(repos.len() as u64, total, "total={} per_page={}", total, per_page);
            let expected_pages = total.div_ceil(u64::from(per_page)).max(1) as usize;
            assert_eq!(search.requests(), expected_pages);
        }
    }

    #[tokio::test]
    async fn test_keeps_api_order() {
        let search = FakeSearch::new(25);
        let repos = search_all(&search, "language:go", 10).await.unwrap();
        let ids: Vec<u64> = repos.iter().map(|r| r.id).collect();
        assert_eq!(ids, (0..25).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_first_request_has_no_page_number() {
        let search = FakeSearch::new(25);
        search_all(&search, "language:go", 10).await.unwrap();
        let requested = search.requested.lock().unwrap().clone();
        assert_eq!(requested, vec![None, Some(2), Some(3)]);
    }

    #[tokio::test]
    async fn test_failure_discards_partial_results() {
        let search = FakeSearch::failing_on(50, 3);
        let result = search_all(&search, "language:go", 10).await;

        assert!(matches!(result, Err(SearchError::Status { .. })));
        // Pages 4 and 5 are never requested
        assert_eq!(search.requests(), 3);
    }

    #[tokio::test]
    async fn test_failure_on_first_page() {
        let search = FakeSearch::failing_on(5, 1);
        assert!(search_all(&search, "language:go", 10).await.is_err());
        assert_eq!(search.requests(), 1);
    }
}
