use super::cache::{AssetCache, has_existing_asset, persist_asset};
use super::resolver::ResolutionEngine;
use crate::config::ProviderChains;
use deckforge_types::{AssetRequest, AssetResolution, AssetSource, UnresolvedReason};
use log::{debug, warn};
use std::sync::Arc;

/// Everything a slide worker needs to resolve assets during one run.
///
/// The cache inside is fresh per run; the engine and chains are shared.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub engine: Arc<ResolutionEngine>,
    pub chains: Arc<ProviderChains>,
    pub cache: Arc<AssetCache>,
    pub reuse_existing_assets: bool,
}

impl RunContext {
    /// Resolves one request through the cache, so each fingerprint reaches the
    /// providers at most once per run.
    pub async fn resolve_request(&self, request: &AssetRequest) -> AssetResolution {
        self.cache
            .lookup_or_resolve(request, || self.resolve_uncached(request))
            .await
    }

    async fn resolve_uncached(&self, request: &AssetRequest) -> AssetResolution {
        let target = request.target_path();

        if self.reuse_existing_assets && has_existing_asset(target).await {
            debug!("Reusing existing {} asset at {}", request.kind, target.display());
            return AssetResolution::resolved(request.clone(), AssetSource::ExistingFile, vec![]);
        }

        let Some(chain) = self.chains.get(request.kind) else {
            warn!("No provider chain configured for {} assets", request.kind);
            return AssetResolution::unresolved(
                request.clone(),
                UnresolvedReason::NoChainConfigured,
                vec![],
            );
        };

        let outcome = self
            .engine
            .resolve(request.kind, &request.parameters, chain)
            .await;

        match outcome.fetched {
            Some((provider, bytes)) => match persist_asset(target, &bytes).await {
                Ok(written) => {
                    if !written {
                        debug!("{} unchanged, skipped write", target.display());
                    }
                    AssetResolution::resolved(
                        request.clone(),
                        AssetSource::Provider(provider),
                        outcome.attempts,
                    )
                }
                Err(e) => {
                    warn!("Could not write {}: {}", target.display(), e);
                    AssetResolution::unresolved(
                        request.clone(),
                        UnresolvedReason::PersistenceFailed(e.to_string()),
                        outcome.attempts,
                    )
                }
            },
            None => AssetResolution::unresolved(
                request.clone(),
                UnresolvedReason::ChainExhausted,
                outcome.attempts,
            ),
        }
    }
}
