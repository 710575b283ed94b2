//! Filesystem-based asset provider.
//!
//! Serves files that already exist under a base directory, such as frames a
//! design tool has synced to disk or hand-made diagrams checked into the deck
//! repository. The request's `path` parameter names the file.
//!
//! # Security
//!
//! Resolved paths must stay inside the base directory; `../` escapes and
//! absolute paths are rejected.

use async_trait::async_trait;
use deckforge_traits::{AssetBytes, AssetProvider, ProviderError};
use deckforge_types::{AssetKind, Parameters};
use log::debug;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Parameter key naming the file to load.
pub const PATH_PARAMETER: &str = "path";

#[derive(Debug)]
pub struct FilesystemProvider {
    base_path: PathBuf,
    canonical_base: Option<PathBuf>,
    /// Kinds this provider will serve. Empty means every kind.
    kinds: Vec<AssetKind>,
}

impl FilesystemProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        // May fail if the directory doesn't exist yet
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
            kinds: Vec::new(),
        }
    }

    /// Restricts the provider to the given kinds.
    pub fn for_kinds(mut self, kinds: impl IntoIterator<Item = AssetKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    pub fn serves(&self, kind: AssetKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }

    /// Returns `None` if the path would escape the base directory.
    fn resolve_path_safe(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        if relative.is_absolute() {
            return None;
        }
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return None;
        }

        let full_path = self.base_path.join(relative);
        if let Ok(canonical) = full_path.canonicalize()
            && let Some(ref base) = self.canonical_base
        {
            // Symlinks can still point outside
            return canonical.starts_with(base).then_some(canonical);
        }
        Some(full_path)
    }
}

#[async_trait]
impl AssetProvider for FilesystemProvider {
    async fn resolve(
        &self,
        kind: AssetKind,
        parameters: &Parameters,
    ) -> Result<AssetBytes, ProviderError> {
        if !self.serves(kind) {
            return Err(ProviderError::UnsupportedKind(kind));
        }
        let path = parameters
            .get_str(PATH_PARAMETER)
            .ok_or_else(|| ProviderError::InvalidParameter(PATH_PARAMETER.to_string()))?;
        let full_path = self
            .resolve_path_safe(path)
            .ok_or_else(|| ProviderError::NotFound(format!("{} (path traversal blocked)", path)))?;

        debug!("Reading {} asset from {}", kind, full_path.display());
        match tokio::fs::read(&full_path).await {
            Ok(data) => Ok(Arc::new(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ProviderError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &'static str {
        "FilesystemProvider"
    }
}
