// src/pipeline/builder.rs
use super::orchestrator::DeckPipeline;
use super::resolver::ResolutionEngine;
use crate::config::{PipelineConfig, ProviderChains, ProviderDecl};
use crate::error::PipelineError;
use deckforge_layout::{LayoutEngine, LayoutMetrics};
use deckforge_resource::FilesystemProvider;
use deckforge_traits::AssetProvider;
use deckforge_types::{AssetKind, Canvas, ProviderId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// A builder for creating a `DeckPipeline`.
pub struct PipelineBuilder {
    providers: HashMap<ProviderId, Arc<dyn AssetProvider>>,
    chains: ProviderChains,
    canvas: Canvas,
    metrics: LayoutMetrics,
    max_concurrency: usize,
    provider_timeout: Duration,
    reuse_existing_assets: bool,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        let defaults = PipelineConfig::default();
        Self {
            providers: HashMap::new(),
            chains: ProviderChains::new(),
            canvas: defaults.canvas,
            metrics: defaults.layout,
            max_concurrency: defaults.max_concurrency,
            provider_timeout: Duration::from_millis(defaults.provider_timeout_ms),
            reuse_existing_assets: defaults.reuse_existing_assets,
        }
    }
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Starts from a loaded configuration, instantiating every declared provider.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let mut builder = Self {
            providers: HashMap::new(),
            chains: config.chains.clone(),
            canvas: config.canvas,
            metrics: config.layout,
            max_concurrency: config.max_concurrency,
            provider_timeout: Duration::from_millis(config.provider_timeout_ms),
            reuse_existing_assets: config.reuse_existing_assets,
        };
        for (id, decl) in &config.providers {
            let provider: Arc<dyn AssetProvider> = match decl {
                ProviderDecl::Filesystem { base_path, kinds } => {
                    Arc::new(FilesystemProvider::new(base_path).for_kinds(kinds.iter().copied()))
                }
            };
            builder.providers.insert(id.clone(), provider);
        }
        Ok(builder)
    }

    /// Registers a provider under `id`, replacing any previous one.
    pub fn with_provider<P>(self, id: impl Into<ProviderId>, provider: P) -> Self
    where
        P: AssetProvider + 'static,
    {
        self.with_shared_provider(id, Arc::new(provider))
    }

    pub fn with_shared_provider(
        mut self,
        id: impl Into<ProviderId>,
        provider: Arc<dyn AssetProvider>,
    ) -> Self {
        self.providers.insert(id.into(), provider);
        self
    }

    /// Sets the ordered provider chain for one asset kind.
    pub fn with_chain<I, S>(mut self, kind: AssetKind, chain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ProviderId>,
    {
        self.chains
            .set(kind, chain.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn with_layout_metrics(mut self, metrics: LayoutMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Number of slides processed concurrently.
    pub fn with_max_concurrency(mut self, workers: usize) -> Self {
        self.max_concurrency = workers;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_reuse_existing_assets(mut self, reuse: bool) -> Self {
        self.reuse_existing_assets = reuse;
        self
    }

    /// Consumes the builder and creates the `DeckPipeline`.
    ///
    /// Fails if a chain names an unregistered provider, or if the canvas,
    /// metrics, concurrency or timeout are unusable.
    pub fn build(self) -> Result<DeckPipeline, PipelineError> {
        for (kind, chain) in self.chains.iter() {
            if let Some(missing) = chain.iter().find(|id| !self.providers.contains_key(*id)) {
                return Err(PipelineError::Config(format!(
                    "chain for '{}' references unknown provider '{}'",
                    kind, missing
                )));
            }
        }
        if self.max_concurrency == 0 {
            return Err(PipelineError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.provider_timeout.is_zero() {
            return Err(PipelineError::Config(
                "provider timeout must be positive".to_string(),
            ));
        }

        let layout = LayoutEngine::new(self.canvas, self.metrics)?;
        let engine = ResolutionEngine::new(self.providers, self.provider_timeout);
        Ok(DeckPipeline::new(
            engine,
            self.chains,
            layout,
            self.max_concurrency,
            self.reuse_existing_assets,
        ))
    }
}
