//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains the I/O-performing code: process execution, HTTP,
//! archive temp files, environment configuration, and logging setup.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.

pub mod archive;
pub mod command_runner;
pub mod config;
pub mod http;
pub mod logging;

pub use command_runner::TokioCommandRunner;
pub use http::ReqwestHttpClient;
