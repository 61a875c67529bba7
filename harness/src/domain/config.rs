//! Harness configuration schema.
//!
//! Pure types only. Loading from the environment lives in `crate::infra::config`.

use serde::Deserialize;

use super::health::Timing;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_BUILDER: &str = "cfbuildpacks/cflinuxfs3-cnb-test-builder";
pub const CFLINUXFS3_STACK: &str = "org.cloudfoundry.stacks.cflinuxfs3";
pub const DEFAULT_BUILD_IMAGE: &str = "cfbuildpacks/cflinuxfs3-cnb-experimental:build";
pub const DEFAULT_RUN_IMAGE: &str = "cfbuildpacks/cflinuxfs3-cnb-experimental:run";
pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_ORG: &str = "cloudfoundry";

// ── Config schema ────────────────────────────────────────────────────────────

/// Programs, images and endpoints the harness talks to.
///
/// Every field has a default, so an empty environment yields a usable config.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HarnessConfig {
    /// Image builder CLI.
    pub builder_bin: String,
    /// Container runtime CLI.
    pub runtime_bin: String,
    /// Builder image passed to `pack build --builder`.
    pub builder: String,
    /// Stack registered by `ensure_stack`.
    pub stack_id: String,
    pub build_image: String,
    pub run_image: String,
    /// Base URL of the releases API.
    pub api_base: String,
    /// Organisation owning the buildpack repositories.
    pub org: String,
    /// Bearer token for the releases API. Read from `GIT_TOKEN`, never from
    /// the prefixed variables.
    #[serde(skip)]
    pub api_token: Option<String>,
    /// Health polling cadence.
    #[serde(skip)]
    pub timing: Timing,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            builder_bin: "pack".to_string(),
            runtime_bin: "docker".to_string(),
            builder: DEFAULT_BUILDER.to_string(),
            stack_id: CFLINUXFS3_STACK.to_string(),
            build_image: DEFAULT_BUILD_IMAGE.to_string(),
            run_image: DEFAULT_RUN_IMAGE.to_string(),
            api_base: GITHUB_API_BASE.to_string(),
            org: DEFAULT_ORG.to_string(),
            api_token: None,
            timing: Timing::default(),
        }
    }
}

impl HarnessConfig {
    #[must_use]
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.is_empty());
        self
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
