//! Domain layer: pure types and parsing.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod app;
pub mod config;
pub mod container;
pub mod error;
pub mod health;
pub mod naming;
pub mod release;

pub use app::{App, AppInfo, AppState};
pub use config::HarnessConfig;
pub use error::HarnessError;
pub use health::{HealthCheck, HealthStatus, Timing};
pub use naming::ImageNamer;
pub use release::{CacheKey, ReleaseAsset, ReleaseDescriptor};
