//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `std` and `anyhow`, never from `crate::infra`.

use std::collections::HashMap;
use std::path::Path;
use std::process::{ExitStatus, Output};

use anyhow::Result;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Result of a command whose output was streamed to the console and captured.
#[derive(Debug)]
pub struct TeedOutput {
    pub status: ExitStatus,
    /// Interleaved stdout and stderr, in arrival order.
    pub log: String,
}

/// A fully read HTTP response.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    /// Header values keyed by lowercase header name.
    pub headers: HashMap<String, Vec<String>>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture stdout and stderr separately.
    ///
    /// A non-zero exit is not an error at this level; callers inspect
    /// `Output::status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or times out.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;

    /// Run a program in `dir`, copying stdout and stderr to this process's
    /// own streams while capturing both into one log.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or its streams fail.
    async fn run_teed(&self, program: &str, args: &[&str], dir: &Path) -> Result<TeedOutput>;
}

// ── HTTP Port ─────────────────────────────────────────────────────────────────

/// Abstracts HTTP GET so the fetcher and inspection helpers can be tested
/// without network access.
#[allow(async_fn_in_trait)]
pub trait HttpClient {
    /// Send a GET request and read the whole response.
    ///
    /// Any status code is returned as a response; only transport failures
    /// are errors.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::HarnessError::Transport`] when the request
    /// cannot be sent or the body cannot be read.
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse>;
}
