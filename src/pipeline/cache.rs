//! Per-run asset cache.
//!
//! Maps a request fingerprint to its resolution. The first caller for a
//! fingerprint runs the resolution; concurrent callers for the same
//! fingerprint wait on the same cell instead of invoking providers again.

use deckforge_types::{AssetRequest, AssetResolution, Fingerprint};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

/// Created per run and dropped with it; there is no eviction.
#[derive(Debug, Default)]
pub struct AssetCache {
    entries: Mutex<HashMap<Fingerprint, Arc<OnceCell<AssetResolution>>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached resolution for `request`, running `resolve` only if
    /// no resolution exists or is in flight for its fingerprint.
    pub async fn lookup_or_resolve<F, Fut>(&self, request: &AssetRequest, resolve: F) -> AssetResolution
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AssetResolution>,
    {
        let fingerprint = request.fingerprint();
        let cell = self.cell_for(&fingerprint);

        let ran = AtomicBool::new(false);
        let resolution = cell
            .get_or_init(|| async {
                ran.store(true, Ordering::Relaxed);
                resolve().await
            })
            .await;

        if ran.load(Ordering::Relaxed) {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Cache hit for {} ({})", request.kind, fingerprint.short());
        }
        resolution.clone()
    }

    /// Already-finished resolution for a fingerprint, if any.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<AssetResolution> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(fingerprint).and_then(|cell| cell.get().cloned())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map(|e| e.len())
            .unwrap_or_else(|e| e.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell_for(&self, fingerprint: &Fingerprint) -> Arc<OnceCell<AssetResolution>> {
        // The map lock is never held across an await; a poisoned lock still
        // holds a consistent map.
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(
            entries
                .entry(fingerprint.clone())
                .or_insert_with(|| Arc::new(OnceCell::new())),
        )
    }
}

/// Writes `bytes` to `path`, creating parent directories.
///
/// Returns `false` when the file already held exactly these bytes and was
/// left untouched.
pub async fn persist_asset(path: &Path, bytes: &[u8]) -> io::Result<bool> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    match tokio::fs::read(path).await {
        Ok(existing) if existing == bytes => return Ok(false),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    tokio::fs::write(path, bytes).await?;
    Ok(true)
}

/// Returns true if a non-empty regular file sits at `path`.
pub async fn has_existing_asset(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}
