// src/app.rs
// =============================================================================
// The startup sequence, once configuration and logging are in place:
//
// 1. Refresh synchronously; a failed search here ends the process
// 2. Start the background refresh task
// 3. Run godoc until it exits
// 4. Stop the background task and report godoc's exit code
// =============================================================================

use crate::config::Config;
use crate::docs;
use crate::fetch::ProcessRunner;
use crate::github::RepositorySearch;
use crate::refresh::{Cycle, Refresher};
use anyhow::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

// Exit code used when godoc was killed by a signal
const SIGNALLED_EXIT_CODE: i32 = 1;

pub async fn run(
    config: Arc<Config>,
    search: Arc<dyn RepositorySearch>,
    runner: Arc<dyn ProcessRunner>,
) -> Result<i32> {
    let refresher = Arc::new(Refresher::new(config.clone(), search, runner.clone()));

    info!("Starting initial refresh of all repositories");
    refresher.refresh(Cycle::Initial).await?;

    let cancel = CancellationToken::new();
    let background = tokio::spawn({
        let refresher = refresher.clone();
        let cancel = cancel.clone();
        async move { refresher.run_periodic(cancel).await }
    });

    let served = docs::serve(runner.as_ref(), &config).await;

    cancel.cancel();
    if let Err(e) = background.await {
        warn!(error = %e, "background refresh task ended abnormally");
    }

    let out = served?;
    if out.success() {
        info!("godoc exited");
    } else {
        error!(code = ?out.code, "godoc exited with error");
    }

    Ok(out.code.unwrap_or(SIGNALLED_EXIT_CODE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FakeRunner;
    use crate::github::FakeSearch;

    fn is_godoc(program: &str) -> bool {
        program == "godoc"
    }

    #[tokio::test]
    async fn test_initial_failure_stops_before_godoc() {
        let runner = Arc::new(FakeRunner::default());
        let search = Arc::new(FakeSearch::failing_on(10, 1));

        let result = run(Arc::new(Config::for_tests()), search, runner.clone()).await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Initial refresh of repositories failed"));
        assert!(!runner.calls().iter().any(|c| is_godoc(&c.program)));
    }

    #[tokio::test]
    async fn test_refresh_then_serve() {
        let runner = Arc::new(FakeRunner::default());
        let search = Arc::new(FakeSearch::new(3));

        let code = run(Arc::new(Config::for_tests()), search, runner.clone())
            .await
            .unwrap();

        assert_eq!(code, 0);
        let calls = runner.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls[..3].iter().all(|c| c.program == "go"));
        assert!(is_godoc(&calls[3].program));
        assert_eq!(calls[3].args, vec!["-http=:6060"]);
    }

    #[tokio::test]
    async fn test_exit_code_comes_from_godoc() {
        let runner = Arc::new(FakeRunner {
            exit_code: Some(3),
            ..FakeRunner::default()
        });

        let code = run(Arc::new(Config::for_tests()), Arc::new(FakeSearch::new(0)), runner)
            .await
            .unwrap();

        assert_eq!(code, 3);
    }
}
