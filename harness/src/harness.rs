//! `Harness`: the entry point that ties configuration, the runtime ports and
//! the shared download cache together.
//!
//! Test suites hold one `Harness` for the whole run and call its methods; every
//! method is a thin delegation to a service in `crate::application::services`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::sync::Mutex;

use crate::application::services::{builder, fetcher, inspect, lifecycle};
use crate::application::{CommandRunner, DownloadCache, HttpClient};
use crate::domain::{App, AppInfo, HarnessConfig, ImageNamer, ReleaseDescriptor};
use crate::infra::http::DEFAULT_HTTP_TIMEOUT;
use crate::infra::{ReqwestHttpClient, TokioCommandRunner, config};

/// Build, run and inspect buildpack test apps.
pub struct Harness<R = TokioCommandRunner, H = ReqwestHttpClient> {
    runner: R,
    http: H,
    config: HarnessConfig,
    cache: DownloadCache,
    namer: Mutex<ImageNamer>,
}

impl Harness {
    /// Production harness configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment holds an unparsable setting or the
    /// HTTP client cannot be built.
    pub fn from_env() -> Result<Self> {
        let config = config::load()?;
        let http = ReqwestHttpClient::new(DEFAULT_HTTP_TIMEOUT)?;
        Ok(Self::new(TokioCommandRunner::default(), http, config))
    }
}

impl<R: CommandRunner, H: HttpClient> Harness<R, H> {
    pub fn new(runner: R, http: H, config: HarnessConfig) -> Self {
        Self {
            runner,
            http,
            config,
            cache: DownloadCache::new(),
            namer: Mutex::new(ImageNamer::from_entropy()),
        }
    }

    /// Share `cache` with other harnesses instead of starting empty.
    #[must_use]
    pub fn with_cache(mut self, cache: DownloadCache) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn with_namer(self, namer: ImageNamer) -> Self {
        Self {
            namer: Mutex::new(namer),
            ..self
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn cache(&self) -> &DownloadCache {
        &self.cache
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    // ── Fetching ─────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// See [`fetcher::fetch_release`].
    pub async fn fetch_release(&self, package: &str) -> Result<ReleaseDescriptor> {
        fetcher::fetch_release(&self.http, &self.config, package).await
    }

    /// Download and extract `url`, cached under `(name, tag)`.
    ///
    /// # Errors
    ///
    /// See [`fetcher::download_and_extract`].
    pub async fn download_and_extract(&self, url: &str, name: &str, tag: &str) -> Result<PathBuf> {
        fetcher::download_and_extract(&self.http, &self.cache, url, name, tag).await
    }

    /// # Errors
    ///
    /// See [`fetcher::latest_release_asset`].
    pub async fn latest_release_asset(&self, package: &str, index: usize) -> Result<PathBuf> {
        fetcher::latest_release_asset(&self.http, &self.cache, &self.config, package, index).await
    }

    /// # Errors
    ///
    /// See [`fetcher::latest_source`].
    pub async fn latest_source(&self, package: &str) -> Result<PathBuf> {
        fetcher::latest_source(&self.http, &self.cache, &self.config, package).await
    }

    // ── Building ─────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// See [`builder::build`].
    pub async fn build(&self, app_dir: &Path, image_name: &str, buildpacks: &[&str]) -> Result<App> {
        builder::build(&self.runner, &self.config, app_dir, image_name, buildpacks).await
    }

    /// Build with a name drawn from this harness's namer.
    ///
    /// # Errors
    ///
    /// See [`builder::build_random`].
    pub async fn build_random(&self, app_dir: &Path, buildpacks: &[&str]) -> Result<App> {
        let mut namer = self.namer.lock().await;
        builder::build_random(&self.runner, &self.config, &mut namer, app_dir, buildpacks).await
    }

    /// # Errors
    ///
    /// See [`builder::ensure_stack`].
    pub async fn ensure_stack(&self) -> Result<()> {
        builder::ensure_stack(&self.runner, &self.config).await
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// See [`lifecycle::start`].
    pub async fn start(&self, app: &mut App) -> Result<()> {
        lifecycle::start(&self.runner, &self.config, app).await
    }

    /// # Errors
    ///
    /// See [`lifecycle::destroy`].
    pub async fn destroy(&self, app: &mut App) -> Result<()> {
        lifecycle::destroy(&self.runner, &self.config, app).await
    }

    // ── Inspection ───────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// See [`inspect::files`].
    pub async fn files(&self, app: &App, fragment: &str) -> Result<Vec<String>> {
        inspect::files(&self.runner, &self.config, app, fragment).await
    }

    /// # Errors
    ///
    /// See [`inspect::info`].
    pub async fn info(&self, app: &App) -> Result<AppInfo> {
        inspect::info(&self.runner, &self.config, app).await
    }

    /// # Errors
    ///
    /// See [`inspect::logs`].
    pub async fn logs(&self, app: &App) -> Result<String> {
        inspect::logs(&self.runner, &self.config, app).await
    }

    /// # Errors
    ///
    /// See [`inspect::http_get`].
    pub async fn http_get(
        &self,
        app: &App,
        path: &str,
    ) -> Result<(String, HashMap<String, Vec<String>>)> {
        inspect::http_get(&self.http, app, path).await
    }

    /// # Errors
    ///
    /// See [`inspect::http_get`].
    pub async fn http_get_body(&self, app: &App, path: &str) -> Result<String> {
        inspect::http_get_body(&self.http, app, path).await
    }
}
