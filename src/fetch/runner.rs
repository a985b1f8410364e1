// src/fetch/runner.rs
// =============================================================================
// The "run an external program" seam.
//
// Both `go get` and `godoc` go through ProcessRunner, so the fetcher and the
// docs launcher can be tested with a fake that only records what it was
// asked to run.
// =============================================================================

use async_trait::async_trait;
use std::io;
use std::process::Stdio;
use tokio::process::Command;

// What to do with the child's stdout/stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Collect stdout and stderr into one string (stdout first)
    Combined,
    /// Child writes straight to our stdout/stderr
    Inherit,
}

// A program plus its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub capture: Capture,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I, capture: Capture) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            capture,
        }
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

// How a finished child went
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; None when the child was killed by a signal
    pub code: Option<i32>,
    /// Combined output, empty for `Capture::Inherit`
    pub output: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs the program to completion. Err means it could not be started.
    async fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput>;
}

// The real runner, backed by tokio::process
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRunner;

#[async_trait]
impl ProcessRunner for TokioRunner {
    async fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args).stdin(Stdio::null());

        match invocation.capture {
            Capture::Combined => {
                let out = cmd.output().await?;
                let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
                output.push_str(&String::from_utf8_lossy(&out.stderr));
                Ok(ProcessOutput {
                    code: out.status.code(),
                    output,
                })
            }
            Capture::Inherit => {
                let status = cmd
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .await?;
                Ok(ProcessOutput {
                    code: status.code(),
                    output: String::new(),
                })
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why #[async_trait]?
//    - Trait objects (`&dyn ProcessRunner`) cannot have plain async methods
//    - async_trait rewrites them to return a boxed future, which is object safe
//
// 2. Why String::from_utf8_lossy?
//    - Program output is bytes, not guaranteed to be valid UTF-8
//    - Invalid sequences become U+FFFD instead of an error
// -----------------------------------------------------------------------------
