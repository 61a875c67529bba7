//! The application handle: one build-to-teardown session.

use std::collections::BTreeMap;

use super::container::strip_color;
use super::health::HealthCheck;

/// Lifecycle state derived from which runtime identifiers are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Image built, no container.
    Built,
    /// Container started and port discovered.
    Running,
    /// Container and image removed.
    Removed,
}

/// An image built by `pack` plus the container started from it.
///
/// Created by a successful build; `start` assigns the container id and port,
/// `destroy` clears them. Owned by one test for its whole duration.
#[derive(Debug, Clone, Default)]
pub struct App {
    /// Optional `--memory` limit, e.g. `"128m"`.
    pub memory: Option<String>,
    /// Environment passed with `-e KEY=VALUE`.
    pub env: BTreeMap<String, String>,
    pub(crate) build_logs: String,
    pub(crate) health_check: Option<HealthCheck>,
    pub(crate) image_name: String,
    pub(crate) container_id: String,
    pub(crate) port: String,
    pub(crate) fixture_name: String,
}

impl App {
    /// A freshly built app with empty environment and no container.
    #[must_use]
    pub fn new(image_name: &str, fixture_name: &str, build_logs: String) -> Self {
        Self {
            image_name: image_name.to_string(),
            fixture_name: fixture_name.to_string(),
            build_logs,
            ..Self::default()
        }
    }

    /// Build output with color codes removed.
    #[must_use]
    pub fn build_logs(&self) -> String {
        strip_color(&self.build_logs)
    }

    /// Build output exactly as `pack` printed it.
    #[must_use]
    pub fn raw_build_logs(&self) -> &str {
        &self.build_logs
    }

    /// Configure the runtime health check used to gate `start`.
    pub fn set_health_check(&mut self, command: &str, interval: &str, timeout: &str) {
        self.health_check = Some(HealthCheck::new(command, interval, timeout));
    }

    #[must_use]
    pub fn health_check(&self) -> Option<&HealthCheck> {
        self.health_check.as_ref()
    }

    pub fn set_memory(&mut self, limit: &str) {
        self.memory = Some(limit.to_string());
    }

    /// Insert or replace one environment variable.
    pub fn set_env(&mut self, key: &str, value: &str) {
        self.env.insert(key.to_string(), value.to_string());
    }

    #[must_use]
    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    /// Short container id, empty until started.
    #[must_use]
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Published host port, empty until started.
    #[must_use]
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Fixture directory the image was built from, used in error messages.
    #[must_use]
    pub fn fixture_name(&self) -> &str {
        &self.fixture_name
    }

    #[must_use]
    pub fn state(&self) -> AppState {
        if !self.container_id.is_empty() {
            AppState::Running
        } else if self.image_name.is_empty() {
            AppState::Removed
        } else {
            AppState::Built
        }
    }

    /// Arguments for `docker run`: detached, all ports published, optional
    /// memory limit and health check, one `-e` per variable, image last.
    #[must_use]
    pub fn run_args(&self) -> Vec<String> {
        let mut args: Vec<String> = ["run", "-d", "-P"].map(String::from).to_vec();
        if let Some(memory) = self.memory.as_deref().filter(|m| !m.is_empty()) {
            args.push("--memory".to_string());
            args.push(memory.to_string());
        }
        if let Some(hc) = &self.health_check {
            args.extend(hc.run_flags());
        }
        for (key, value) in &self.env {
            args.push("-e".to_string());
            args.push(format!("{key}={value}"));
        }
        args.push(self.image_name.clone());
        args
    }
}

/// Identifiers reported by `App` inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub container_id: String,
    pub image_name: String,
    /// `pack` cache volumes present on the runtime.
    pub cache_volumes: Vec<String>,
}
