//! Integration tests for cnb-harness
//!
//! `cli_tests` spawns the real binary. The rest drive the public `Harness`
//! API against in-memory runtime and HTTP fakes.

mod fetch_cache;
mod mocks;
