// src/fetch/mod.rs
// =============================================================================
// This module downloads repositories into the local Go workspace.
//
// Submodules:
// - runner: runs external programs (real tokio::process runner + trait)
// - dispatch: turns search results into `go get -d` calls
// =============================================================================

mod dispatch;
mod runner;

pub use dispatch::{fetch_all, FetchReport};
pub use runner::{Capture, Invocation, ProcessOutput, ProcessRunner, TokioRunner};

#[cfg(test)]
pub(crate) use runner::tests::FakeRunner;
