//! Loads `HarnessConfig` from the environment via `envy`.
//!
//! Each field maps to `CNB_HARNESS_<FIELD>`:
//!   - `CNB_HARNESS_BUILDER_BIN`  (default `pack`)
//!   - `CNB_HARNESS_RUNTIME_BIN`  (default `docker`)
//!   - `CNB_HARNESS_BUILDER`      (default `cfbuildpacks/cflinuxfs3-cnb-test-builder`)
//!   - `CNB_HARNESS_STACK_ID`, `CNB_HARNESS_BUILD_IMAGE`, `CNB_HARNESS_RUN_IMAGE`
//!   - `CNB_HARNESS_API_BASE`     (default `https://api.github.com`)
//!   - `CNB_HARNESS_ORG`          (default `cloudfoundry`)
//!
//! The releases API token comes from `GIT_TOKEN`.

use anyhow::{Context, Result};
use tracing::warn;

use crate::domain::HarnessConfig;

pub const ENV_PREFIX: &str = "CNB_HARNESS_";
pub const TOKEN_VAR: &str = "GIT_TOKEN";

/// Read configuration from the process environment.
///
/// A missing token is valid; requests are then unauthenticated and rate
/// limited, which is logged once as a warning.
///
/// # Errors
///
/// Returns an error if a prefixed variable cannot be parsed.
pub fn load() -> Result<HarnessConfig> {
    let config: HarnessConfig = envy::prefixed(ENV_PREFIX)
        .from_env()
        .with_context(|| format!("failed to load config from {ENV_PREFIX}* env vars"))?;
    let token = std::env::var(TOKEN_VAR).ok();
    let config = config.with_api_token(token);
    if config.api_token.is_none() {
        warn!(
            "using unauthenticated GitHub API, consider setting the {TOKEN_VAR} environment variable"
        );
    }
    Ok(config)
}
