// src/docs.rs
// =============================================================================
// Starts godoc and waits for it to exit.
//
// godoc owns the terminal (inherited stdio) and its lifetime is the lifetime
// of the whole process: when it exits, main exits with the same code.
// =============================================================================

use crate::config::Config;
use crate::fetch::{Capture, Invocation, ProcessOutput, ProcessRunner};
use std::io;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

// Builds `<godoc> -http=<addr>`
pub fn godoc_invocation(godoc_bin: &str, listen_addr: &str) -> Invocation {
    Invocation::new(godoc_bin, [format!("-http={}", listen_addr)], Capture::Inherit)
}

// Runs godoc until it exits. Err only if it could not be started at all.
pub async fn serve(runner: &dyn ProcessRunner, config: &Config) -> Result<ProcessOutput, LaunchError> {
    let invocation = godoc_invocation(&config.godoc_bin, &config.listen_addr);
    info!(command = %invocation, "Starting godoc");

    runner
        .run(&invocation)
        .await
        .map_err(|source| LaunchError::Spawn {
            program: invocation.program.clone(),
            source,
        })
}
