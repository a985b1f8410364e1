// src/refresh/mod.rs
// =============================================================================
// The refresh loop: search for repositories, then `go get` each one.
//
// A refresh runs once at startup and then on a timer. The two differ only in
// what a search failure means:
// - Cycle::Initial   -> the error is returned and the process gives up
// - Cycle::Scheduled -> the error is logged and we wait for the next tick
//
// The background task runs cycles inline, one at a time. A tick that comes
// due while a cycle is still running is skipped rather than queued, so a slow
// cycle can never overlap the next one.
// =============================================================================

use crate::config::Config;
use crate::fetch::{fetch_all, FetchReport, ProcessRunner};
use crate::github::{search_all, RepositorySearch, SearchError};
use std::sync::Arc;
use thiserror::Error;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

// Which refresh this is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// The synchronous refresh before godoc starts
    Initial,
    /// Every refresh fired by the timer
    Scheduled,
}

impl Cycle {
    /// Whether a failed search should abort the process
    pub fn is_fatal(self) -> bool {
        matches!(self, Cycle::Initial)
    }
}

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("Initial refresh of repositories failed: {source}")]
    Search {
        #[source]
        source: SearchError,
    },
}

pub struct Refresher {
    config: Arc<Config>,
    search: Arc<dyn RepositorySearch>,
    runner: Arc<dyn ProcessRunner>,
}

impl Refresher {
    pub fn new(
        config: Arc<Config>,
        search: Arc<dyn RepositorySearch>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            config,
            search,
            runner,
        }
    }

    /// Runs one search-then-fetch pass.
    ///
    /// Returns `Ok(None)` when a scheduled cycle could not list repositories.
    /// Individual fetch failures never make this fail; they only show up in
    /// the report.
    pub async fn refresh(&self, cycle: Cycle) -> Result<Option<FetchReport>, RefreshError> {
        let repos = match search_all(
            self.search.as_ref(),
            &self.config.query,
            self.config.per_page,
        )
        .await
        {
            Ok(repos) => repos,
            Err(source) if cycle.is_fatal() => return Err(RefreshError::Search { source }),
            Err(e) => {
                error!(error = %e, "failed to download repositories from GitHub");
                return Ok(None);
            }
        };

        info!(count = repos.len(), query = %self.config.query, "found repositories");

        let report = fetch_all(self.runner.as_ref(), &self.config.go_bin, &repos).await;
        info!(
            fetched = report.fetched,
            failed = report.failed,
            skipped = report.skipped,
            "Refresh complete"
        );

        Ok(Some(report))
    }

    /// Refreshes every `refresh_interval` until `cancel` fires.
    ///
    /// The first scheduled refresh happens one full interval after the call.
    /// Cancellation also interrupts a cycle that is in progress.
    pub async fn run_periodic(&self, cancel: CancellationToken) {
        let period = self.config.refresh_interval;
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // End of the previous cycle; ticks scheduled before it were missed
        let mut last_cycle_end: Option<Instant> = None;

        loop {
            let scheduled = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                scheduled = interval.tick() => scheduled,
            };

            if last_cycle_end.is_some_and(|end| scheduled < end) {
                debug!("skipping refresh tick that came due during the previous cycle");
                continue;
            }

            info!("Beginning a refresh of all repositories");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("refresh cancelled while in progress");
                    break;
                }
                // Scheduled cycles log their own search failures and never return Err
                _ = self.refresh(Cycle::Scheduled) => {}
            }
            last_cycle_end = Some(Instant::now());
        }

        info!("refresh task stopped");
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<dyn RepositorySearch> instead of GitHubClient?
//    - `dyn Trait` lets tests pass a fake search without touching the network
//    - Arc lets the startup code and the spawned task share the same object
//
// 2. What does tokio::select! do here?
//    - It waits on several futures and runs the branch of whichever finishes first
//    - `biased;` makes it check the branches top to bottom, so cancellation
//      always wins over a tick that is ready at the same moment
//    - The losing future is dropped, which is how a running cycle gets cancelled
//
// 3. Why CancellationToken?
//    - Clones of a token all observe the same `cancel()` call
//    - app.rs keeps one clone and gives the other to the background task
// -----------------------------------------------------------------------------
