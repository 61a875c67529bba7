//! Health check domain types and pure parsing functions.
//!
//! This module is intentionally free of I/O, async, and external layer imports.

use std::time::Duration;

/// Default interval between health status queries.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Default deadline for a container to report healthy.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(40);

// ── Types ─────────────────────────────────────────────────────────────────────

/// Container health check passed to `docker run`.
///
/// Every field is optional. Without a command the runtime runs no check and
/// polling is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthCheck {
    /// Value for `--health-cmd`.
    pub command: Option<String>,
    /// Value for `--health-interval`, e.g. `"1s"`.
    pub interval: Option<String>,
    /// Value for `--health-timeout`, e.g. `"3s"`.
    pub timeout: Option<String>,
}

impl HealthCheck {
    /// Build a health check from the three runtime flag values.
    ///
    /// Empty strings are treated as "not set".
    #[must_use]
    pub fn new(command: &str, interval: &str, timeout: &str) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            command: non_empty(command),
            interval: non_empty(interval),
            timeout: non_empty(timeout),
        }
    }

    /// Whether a readiness poll is needed after the container starts.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.command.is_some()
    }

    /// Runtime flags for this health check, in `docker run` order.
    #[must_use]
    pub fn run_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        for (flag, value) in [
            ("--health-cmd", &self.command),
            ("--health-interval", &self.interval),
            ("--health-timeout", &self.timeout),
        ] {
            if let Some(value) = value {
                flags.push(flag.to_string());
                flags.push(value.clone());
            }
        }
        flags
    }
}

/// Health status as reported by `docker inspect -f {{.State.Health.Status}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Starting,
    /// Anything else, including the empty string and `<no value>`.
    Unknown(String),
}

impl HealthStatus {
    /// Parse raw runtime output. Surrounding whitespace is ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "healthy" => Self::Healthy,
            "unhealthy" => Self::Unhealthy,
            "starting" => Self::Starting,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Whether polling stops on this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Healthy | Self::Unhealthy)
    }
}

/// Polling cadence for the readiness loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Period of the status ticker. The first query fires one period after start.
    pub tick: Duration,
    /// One-shot deadline for the whole poll.
    pub deadline: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            deadline: DEFAULT_DEADLINE,
        }
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
