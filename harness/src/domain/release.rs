//! Release descriptors from the GitHub releases API.
//!
//! Pure types and functions only. No I/O, no async.

use serde::Deserialize;

use super::error::HarnessError;

/// One downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub browser_download_url: String,
}

/// The latest published release of a buildpack package.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseDescriptor {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
    /// Source archive for the tagged commit.
    #[serde(rename = "tarball_url")]
    pub source_tarball: String,
}

impl ReleaseDescriptor {
    /// Decode the body of a `releases/latest` response.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Decode`] if the body is not a release object.
    pub fn from_json(body: &[u8]) -> Result<Self, HarnessError> {
        serde_json::from_slice(body).map_err(|e| HarnessError::Decode(e.to_string()))
    }

    /// Download URL and tag of the asset at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::AssetIndexOutOfRange`] when `index >= assets.len()`.
    pub fn asset_url(&self, index: usize) -> Result<(&str, &str), HarnessError> {
        self.assets
            .get(index)
            .map(|asset| (asset.browser_download_url.as_str(), self.tag_name.as_str()))
            .ok_or(HarnessError::AssetIndexOutOfRange {
                index,
                len: self.assets.len(),
            })
    }
}

/// `{api_base}/repos/{org}/{package}/releases/latest`.
#[must_use]
pub fn latest_release_endpoint(api_base: &str, org: &str, package: &str) -> String {
    format!(
        "{}/repos/{org}/{package}/releases/latest",
        api_base.trim_end_matches('/')
    )
}

/// Key of one entry in the download cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub name: String,
    pub tag: String,
}

impl CacheKey {
    #[must_use]
    pub fn new(name: &str, tag: &str) -> Self {
        Self {
            name: name.to_string(),
            tag: tag.to_string(),
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.tag)
    }
}

/// Lowercase hex encoding of a digest.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

// ── Unit tests ────────────────────────────────────────────────────────────────
