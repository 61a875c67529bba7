//! Download cache shared by every fetch made through one `Harness`.
//!
//! Entries are keyed on `(name, tag)`, appended once and never evicted.
//! Each key owns a `OnceCell`, so concurrent requests for the same key wait
//! on a single network fetch instead of racing.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use sha2::{Digest, Sha256};
use tokio::sync::OnceCell;

use crate::domain::CacheKey;
use crate::domain::release::hex_encode;

/// Archive bytes held by the cache.
#[derive(Debug, Clone)]
pub struct CachedArchive {
    pub bytes: Arc<[u8]>,
    /// Hex SHA-256 of `bytes`.
    pub sha256: String,
}

impl CachedArchive {
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        let sha256 = hex_encode(&Sha256::digest(&bytes));
        Self {
            bytes: bytes.into(),
            sha256,
        }
    }
}

type Slot = Arc<OnceCell<CachedArchive>>;

/// Cloneable handle to a process-lifetime archive cache.
///
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct DownloadCache {
    slots: Arc<Mutex<HashMap<CacheKey, Slot>>>,
}

impl DownloadCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &CacheKey) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    /// Return the cached archive for `key`, running `fetch` only on a miss.
    ///
    /// A failed fetch stores nothing, so a later call retries.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `fetch`.
    pub async fn get_or_fetch<F, Fut>(&self, key: &CacheKey, fetch: F) -> Result<CachedArchive>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>>>,
    {
        let slot = self.slot(key);
        let archive = slot
            .get_or_try_init(|| async move { fetch().await.map(CachedArchive::new) })
            .await?;
        Ok(archive.clone())
    }

    /// Number of populated entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.initialized()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
