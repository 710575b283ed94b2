use crate::error::PipelineError;
use deckforge_layout::LayoutMetrics;
use deckforge_types::{AssetKind, Canvas, ProviderId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `DECKFORGE__MAX_CONCURRENCY=8`.
pub const ENV_PREFIX: &str = "DECKFORGE";

/// Default per-call provider timeout.
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 30_000;

/// Ordered provider ids per asset kind.
///
/// Chains are static for a run: the engine walks them in declared order and
/// never reorders based on past failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderChains(BTreeMap<AssetKind, Vec<ProviderId>>);

impl ProviderChains {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: AssetKind, chain: Vec<ProviderId>) {
        self.0.insert(kind, chain);
    }

    /// The chain for `kind`, or `None` if the kind has no chain configured.
    pub fn get(&self, kind: AssetKind) -> Option<&[ProviderId]> {
        self.0.get(&kind).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetKind, &Vec<ProviderId>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A provider the CLI can instantiate from configuration.
///
/// HTTP-backed providers carry credentials and are registered in code instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderDecl {
    Filesystem {
        base_path: PathBuf,
        /// Kinds served; empty means all.
        #[serde(default)]
        kinds: Vec<AssetKind>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub canvas: Canvas,
    /// Number of slide workers.
    ///
    /// Defaults to the number of CPUs, at least 2.
    pub max_concurrency: usize,
    pub provider_timeout_ms: u64,
    /// Treat a non-empty file already at an asset's target path as resolved.
    pub reuse_existing_assets: bool,
    pub layout: LayoutMetrics,
    pub chains: ProviderChains,
    pub providers: BTreeMap<ProviderId, ProviderDecl>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            max_concurrency: num_cpus::get().max(2),
            provider_timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
            reuse_existing_assets: false,
            layout: LayoutMetrics::default(),
            chains: ProviderChains::default(),
            providers: BTreeMap::new(),
        }
    }
}

impl PipelineConfig {
    /// Loads configuration from an optional file (TOML, JSON or YAML by
    /// extension), layered with `DECKFORGE__*` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self, PipelineError> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            if !path.exists() {
                return Err(PipelineError::Config(format!(
                    "config file '{}' not found",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path));
        }

        // Always layer environment variables on top
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

        let config: PipelineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_concurrency == 0 {
            return Err(PipelineError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.provider_timeout_ms == 0 {
            return Err(PipelineError::Config(
                "provider_timeout_ms must be positive".to_string(),
            ));
        }
        self.layout.validate()?;
        Ok(())
    }
}
