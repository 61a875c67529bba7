//! Typed domain error enum.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, `std::process`, or `std::net`. Operations return
//! `anyhow::Result` and raise these variants with `.into()`, so callers can
//! recover the tag with `err.downcast_ref::<HarnessError>()`.

use thiserror::Error;

/// Every failure the harness reports to its caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HarnessError {
    /// An external command exited non-zero.
    #[error("`{command}` failed:\n{output}")]
    CommandFailed { command: String, output: String },

    /// `pack build` exited non-zero. Carries the full captured build log.
    #[error("failed to build image '{image}':\n{logs}")]
    BuildFailed { image: String, logs: String },

    /// The health-check deadline elapsed before the container became healthy.
    #[error("timed out waiting for app: {fixture}")]
    HealthCheckTimeout { fixture: String },

    /// The runtime reported the container as unhealthy.
    #[error("app failed to start: {fixture}")]
    Unhealthy { fixture: String },

    /// Network or transport failure talking to a remote endpoint.
    #[error("transport error: {0}")]
    Transport(String),

    /// The requested release asset does not exist.
    #[error("there is no release asset at index {index} ({len} available)")]
    AssetIndexOutOfRange { index: usize, len: usize },

    /// An HTTP response carried a status outside 200–299.
    #[error("received bad response from {url}: HTTP {status}")]
    BadStatus { url: String, status: u16 },

    /// The releases API has no latest release for this package.
    #[error("no release found for '{package}'")]
    ReleaseNotFound { package: String },

    /// A command succeeded but its output could not be interpreted.
    #[error("unexpected output from `{command}`: {output:?}")]
    UnexpectedOutput { command: String, output: String },

    /// The operation needs a running container but none was started.
    #[error("app has not been started")]
    NotStarted,

    /// A response body could not be decoded.
    #[error("cannot decode response: {0}")]
    Decode(String),
}
