//! AssetProvider trait for abstracting asset sources.
//!
//! Every external content source (chart renderer, image generator, stock-photo
//! service, diagram renderer, avatar generator, design-tool export) is reached
//! through this one contract. The pipeline never looks at provider-specific
//! request or response shapes.

use async_trait::async_trait;
use deckforge_types::{AssetKind, Parameters};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for a single provider invocation.
///
/// None of these ever escape the resolution engine: each one only means
/// "try the next provider in the chain".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Provider returned an empty response")]
    EmptyResponse,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unsupported asset kind: {0}")]
    UnsupportedKind(AssetKind),

    #[error("Missing or invalid parameter '{0}'")]
    InvalidParameter(String),

    #[error("Timed out after {0} ms")]
    Timeout(u64),

    #[error("Provider panicked: {0}")]
    Panicked(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        ProviderError::Io(err.to_string())
    }
}

/// Asset bytes as returned by a provider (reference-counted).
pub type AssetBytes = Arc<Vec<u8>>;

/// A source of visual assets.
///
/// # Implementations
///
/// - `InMemoryProvider`: pre-populated bytes keyed by kind and parameters
/// - `FilesystemProvider` (deckforge-resource): files under a base directory
///
/// HTTP-backed providers live with the application that owns the API keys.
#[async_trait]
pub trait AssetProvider: Send + Sync + Debug {
    /// Produce the bytes for one asset.
    ///
    /// `parameters` is the request's payload, passed through verbatim.
    async fn resolve(
        &self,
        kind: AssetKind,
        parameters: &Parameters,
    ) -> Result<AssetBytes, ProviderError>;

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An in-memory asset provider.
///
/// Entries are keyed by asset kind plus the canonical form of the parameters,
/// so lookups do not depend on parameter insertion order.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    assets: RwLock<HashMap<(AssetKind, String), AssetBytes>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset to the store.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the internal lock is poisoned.
    pub fn add(
        &self,
        kind: AssetKind,
        parameters: &Parameters,
        data: Vec<u8>,
    ) -> Result<(), ProviderError> {
        let mut assets = self
            .assets
            .write()
            .map_err(|_| ProviderError::Unavailable("asset store lock poisoned".to_string()))?;
        assets.insert(key(kind, parameters), Arc::new(data));
        Ok(())
    }

    /// Builder-style [`add`](Self::add) for test and fixture setup.
    pub fn with(self, kind: AssetKind, parameters: &Parameters, data: Vec<u8>) -> Self {
        if let Ok(mut assets) = self.assets.write() {
            assets.insert(key(kind, parameters), Arc::new(data));
        }
        self
    }

    /// Get the number of assets in the store.
    ///
    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.assets.read().map(|a| a.len()).unwrap_or(0)
    }

    /// Returns `true` if the lock is poisoned (safe default).
    pub fn is_empty(&self) -> bool {
        self.assets.read().map(|a| a.is_empty()).unwrap_or(true)
    }
}

fn key(kind: AssetKind, parameters: &Parameters) -> (AssetKind, String) {
    (kind, parameters.to_canonical_json())
}

#[async_trait]
impl AssetProvider for InMemoryProvider {
    async fn resolve(
        &self,
        kind: AssetKind,
        parameters: &Parameters,
    ) -> Result<AssetBytes, ProviderError> {
        let assets = self
            .assets
            .read()
            .map_err(|_| ProviderError::Unavailable("asset store lock poisoned".to_string()))?;
        assets
            .get(&key(kind, parameters))
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("{} {}", kind, parameters)))
    }

    fn name(&self) -> &'static str {
        "InMemoryProvider"
    }
}
