//! Application layer: port trait definitions and use-case orchestration.
//!
//! Services depend on `crate::domain` and the ports declared here; the only
//! infrastructure they touch directly is `crate::infra::archive` for
//! temp-file handling.

pub mod cache;
pub mod ports;
pub mod services;

pub use cache::{CachedArchive, DownloadCache};
pub use ports::{CommandRunner, HttpClient, HttpResponse, TeedOutput};
