//! Test harness for Cloud Native Buildpacks.
//!
//! Fetches buildpack release archives, builds app fixtures with `pack`, runs
//! the resulting images under a container runtime, and inspects them.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod application;
pub mod domain;
pub mod harness;
pub mod infra;

pub use domain::{App, AppInfo, HarnessConfig, HarnessError, Timing};
pub use harness::Harness;
