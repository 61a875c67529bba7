//! Artifact fetcher: resolve a buildpack's latest release, download its
//! archives through the shared cache, and extract them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::application::cache::DownloadCache;
use crate::application::ports::{HttpClient, HttpResponse};
use crate::domain::release::latest_release_endpoint;
use crate::domain::{CacheKey, HarnessConfig, HarnessError, ReleaseDescriptor};
use crate::infra::archive;

const USER_AGENT: &str = concat!("cnb-harness/", env!("CARGO_PKG_VERSION"));

fn ensure_success(url: &str, response: &HttpResponse) -> Result<()> {
    if !response.is_success() {
        return Err(HarnessError::BadStatus {
            url: url.to_string(),
            status: response.status,
        }
        .into());
    }
    Ok(())
}

/// Releases endpoint for `package` under the configured org.
#[must_use]
pub fn release_endpoint(config: &HarnessConfig, package: &str) -> String {
    latest_release_endpoint(&config.api_base, &config.org, package)
}

/// Fetch the latest release descriptor for `package`.
///
/// Sends the bearer token when one is configured.
///
/// # Errors
///
/// Returns [`HarnessError::ReleaseNotFound`] on 404, [`HarnessError::BadStatus`]
/// on any other non-2xx status, and [`HarnessError::Decode`] on a malformed body.
pub async fn fetch_release(
    http: &impl HttpClient,
    config: &HarnessConfig,
    package: &str,
) -> Result<ReleaseDescriptor> {
    let url = release_endpoint(config, package);
    let auth = config.api_token.as_deref().map(|t| format!("Bearer {t}"));
    let mut headers = vec![
        ("Accept", "application/vnd.github+json"),
        ("User-Agent", USER_AGENT),
    ];
    if let Some(auth) = auth.as_deref() {
        headers.push(("Authorization", auth));
    }

    let response = http.get(&url, &headers).await?;
    if response.status == 404 {
        return Err(HarnessError::ReleaseNotFound {
            package: package.to_string(),
        }
        .into());
    }
    ensure_success(&url, &response)?;
    let release = ReleaseDescriptor::from_json(&response.body)?;
    debug!(%package, tag = %release.tag_name, assets = release.assets.len(), "resolved release");
    Ok(release)
}

/// Download `url` as the archive for `(name, tag)`, returning a fresh temp copy.
///
/// The network is hit at most once per key for the lifetime of `cache`; every
/// call gets its own file, removed when the returned guard is dropped.
///
/// # Errors
///
/// Returns a transport or [`HarnessError::BadStatus`] error from the download,
/// or an I/O error writing the temp copy.
pub async fn download_archive(
    http: &impl HttpClient,
    cache: &DownloadCache,
    url: &str,
    name: &str,
    tag: &str,
) -> Result<NamedTempFile> {
    let key = CacheKey::new(name, tag);
    let label = &key;
    let archive = cache
        .get_or_fetch(&key, move || async move {
            info!(key = %label, %url, "downloading archive");
            let response = http.get(url, &[("User-Agent", USER_AGENT)]).await?;
            ensure_success(url, &response)?;
            anyhow::Ok(response.body)
        })
        .await?;
    debug!(%key, sha256 = %archive.sha256, bytes = archive.bytes.len(), "archive ready");
    archive::write_temp_copy(&archive.bytes)
}

/// Unpack a `.tar.gz` into a fresh temp directory on a blocking thread.
///
/// # Errors
///
/// Returns an error if the archive is malformed or cannot be read.
pub async fn extract_archive(archive: NamedTempFile) -> Result<PathBuf> {
    tokio::task::spawn_blocking(move || {
        let dir = archive::extract_tar_gz(archive.path())?;
        archive.close().context("removing temp archive")?;
        Ok(dir)
    })
    .await
    .context("extraction task panicked")?
}

/// Download `url` for `(name, tag)` and extract it. The temp archive is gone
/// by the time this returns.
///
/// # Errors
///
/// See [`download_archive`] and [`extract_archive`].
pub async fn download_and_extract(
    http: &impl HttpClient,
    cache: &DownloadCache,
    url: &str,
    name: &str,
    tag: &str,
) -> Result<PathBuf> {
    let archive = download_archive(http, cache, url, name, tag).await?;
    let dir = extract_archive(archive).await?;
    info!(%name, %tag, dir = %dir.display(), "extracted archive");
    Ok(dir)
}

/// Extract release asset `index` of the latest release of `package`.
///
/// # Errors
///
/// Returns [`HarnessError::AssetIndexOutOfRange`] if the release has no such
/// asset, plus any error from [`fetch_release`] or [`download_and_extract`].
pub async fn latest_release_asset(
    http: &impl HttpClient,
    cache: &DownloadCache,
    config: &HarnessConfig,
    package: &str,
    index: usize,
) -> Result<PathBuf> {
    let release = fetch_release(http, config, package).await?;
    let (url, tag) = release.asset_url(index)?;
    download_and_extract(http, cache, url, package, tag).await
}

/// Extract the source tarball of the latest release of `package`.
///
/// Source archives are cached under `<package>-source` so they never collide
/// with a release asset of the same tag.
///
/// # Errors
///
/// Any error from [`fetch_release`] or [`download_and_extract`].
pub async fn latest_source(
    http: &impl HttpClient,
    cache: &DownloadCache,
    config: &HarnessConfig,
    package: &str,
) -> Result<PathBuf> {
    let release = fetch_release(http, config, package).await?;
    let name = format!("{package}-source");
    download_and_extract(http, cache, &release.source_tarball, &name, &release.tag_name).await
}

// ── Unit tests ────────────────────────────────────────────────────────────────
