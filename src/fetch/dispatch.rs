// src/fetch/dispatch.rs
// =============================================================================
// Downloads every repository found by the search with `go get -d`.
//
// Rules:
// - no git_url: skip it, not an error
// - "git://" prefix: stripped, so `go get` picks its default transport
// - one failing download is logged and the loop moves on
//
// Nothing is remembered between cycles. `go get -d` on a repository that is
// already in GOPATH is cheap, so re-running it every cycle is fine.
// =============================================================================

use super::runner::{Capture, Invocation, ProcessRunner};
use crate::github::Repository;
use tracing::{debug, warn};

const GIT_PROTOCOL_PREFIX: &str = "git://";

// Counters for one pass over the repositories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Repositories returned by the search
    pub found: usize,
    /// Repositories without a git URL
    pub skipped: usize,
    /// `go get` succeeded
    pub fetched: usize,
    /// `go get` failed or could not be started
    pub failed: usize,
}

// Turns a git:// clone URL into something `go get` accepts.
//
//   git://ghe.example.com/org/repo.git -> ghe.example.com/org/repo.git
//   ghe.example.com/org/repo           -> ghe.example.com/org/repo
pub fn normalize_git_url(git_url: &str) -> &str {
    git_url.strip_prefix(GIT_PROTOCOL_PREFIX).unwrap_or(git_url)
}

// Builds `<go> get -d <path>`
pub fn go_get_invocation(go_bin: &str, import_path: &str) -> Invocation {
    Invocation::new(go_bin, ["get", "-d", import_path], Capture::Combined)
}

// Runs `go get -d` for every repository, in order, never stopping early.
pub async fn fetch_all(
    runner: &dyn ProcessRunner,
    go_bin: &str,
    repositories: &[Repository],
) -> FetchReport {
    let mut report = FetchReport {
        found: repositories.len(),
        ..FetchReport::default()
    };

    for repo in repositories {
        let Some(git_url) = repo.git_url.as_deref() else {
            report.skipped += 1;
            continue;
        };

        let import_path = normalize_git_url(git_url);
        let invocation = go_get_invocation(go_bin, import_path);

        match runner.run(&invocation).await {
            Ok(out) if out.success() => {
                debug!(repo = %repo.full_name, id = repo.id, url = import_path, "fetched repository");
                report.fetched += 1;
            }
            Ok(out) => {
                warn!(
                    repo = %repo.full_name,
                    url = import_path,
                    code = ?out.code,
                    "Failed to get the repository:\n{}",
                    out.output
                );
                report.failed += 1;
            }
            Err(e) => {
                warn!(
                    repo = %repo.full_name,
                    url = import_path,
                    error = %e,
                    "Failed to run {}",
                    invocation.program
                );
                report.failed += 1;
            }
        }
    }

    report
}
