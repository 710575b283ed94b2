//! Outcomes of resolving an [`AssetRequest`] through a provider chain.

use crate::asset::{AssetRequest, Fingerprint};
use crate::ids::ProviderId;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the bytes of a resolved asset came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "provider")]
pub enum AssetSource {
    /// A provider in the chain produced the bytes.
    Provider(ProviderId),
    /// A non-empty file already sat at the target path and reuse was enabled.
    ExistingFile,
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSource::Provider(id) => write!(f, "{}", id),
            AssetSource::ExistingFile => f.write_str("existing file"),
        }
    }
}

/// Why a request ended without an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "message")]
pub enum UnresolvedReason {
    /// Every provider in the chain failed.
    ChainExhausted,
    /// No chain is configured for the request's kind.
    NoChainConfigured,
    /// A provider succeeded but writing the bytes to the target path failed.
    PersistenceFailed(String),
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::ChainExhausted => f.write_str("provider chain exhausted"),
            UnresolvedReason::NoChainConfigured => f.write_str("no provider chain configured"),
            UnresolvedReason::PersistenceFailed(msg) => write!(f, "could not persist asset: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ResolutionOutcome {
    Resolved { path: PathBuf, source: AssetSource },
    Unresolved { reason: UnresolvedReason },
}

/// One failed provider invocation, kept for provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderAttempt {
    pub provider: ProviderId,
    pub failure: String,
}

/// The result of resolving one request. Produced once per request per run and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetResolution {
    pub request: AssetRequest,
    pub outcome: ResolutionOutcome,
    /// Providers that failed before the outcome was reached, in chain order.
    pub attempts: Vec<ProviderAttempt>,
}

impl AssetResolution {
    pub fn resolved(
        request: AssetRequest,
        source: AssetSource,
        attempts: Vec<ProviderAttempt>,
    ) -> Self {
        let path = request.target_path.clone();
        Self {
            request,
            outcome: ResolutionOutcome::Resolved { path, source },
            attempts,
        }
    }

    pub fn unresolved(
        request: AssetRequest,
        reason: UnresolvedReason,
        attempts: Vec<ProviderAttempt>,
    ) -> Self {
        Self {
            request,
            outcome: ResolutionOutcome::Unresolved { reason },
            attempts,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.outcome, ResolutionOutcome::Resolved { .. })
    }

    /// The local file of a resolved asset.
    pub fn path(&self) -> Option<&Path> {
        match &self.outcome {
            ResolutionOutcome::Resolved { path, .. } => Some(path),
            ResolutionOutcome::Unresolved { .. } => None,
        }
    }

    /// The provider that satisfied the request, if one did.
    pub fn provider_used(&self) -> Option<&ProviderId> {
        match &self.outcome {
            ResolutionOutcome::Resolved {
                source: AssetSource::Provider(id),
                ..
            } => Some(id),
            _ => None,
        }
    }
}

/// Resolutions keyed by request fingerprint, as handed to layout composition.
pub type ResolutionMap = HashMap<Fingerprint, AssetResolution>;
