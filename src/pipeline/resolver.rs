use deckforge_traits::{AssetBytes, AssetProvider, ProviderError};
use deckforge_types::{AssetKind, Parameters, ProviderAttempt, ProviderId};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Result of walking one provider chain.
#[derive(Debug, Clone)]
pub struct ChainOutcome {
    /// The first provider that returned non-empty bytes.
    pub fetched: Option<(ProviderId, AssetBytes)>,
    /// Failed invocations before `fetched` (or all of them), in chain order.
    pub attempts: Vec<ProviderAttempt>,
}

/// Walks a provider chain until one provider succeeds.
///
/// Each provider runs on its own task with a timeout, so a hung adapter costs
/// at most the timeout and a panicking one is reported as a failure.
#[derive(Debug, Clone)]
pub struct ResolutionEngine {
    providers: HashMap<ProviderId, Arc<dyn AssetProvider>>,
    timeout: Duration,
}

impl ResolutionEngine {
    pub fn new(providers: HashMap<ProviderId, Arc<dyn AssetProvider>>, timeout: Duration) -> Self {
        Self { providers, timeout }
    }

    pub fn has_provider(&self, id: &ProviderId) -> bool {
        self.providers.contains_key(id)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn resolve(
        &self,
        kind: AssetKind,
        parameters: &Parameters,
        chain: &[ProviderId],
    ) -> ChainOutcome {
        let mut attempts = Vec::new();

        for id in chain {
            let result = match self.providers.get(id) {
                Some(provider) => self.invoke(Arc::clone(provider), kind, parameters).await,
                None => Err(ProviderError::Unavailable("provider not registered".to_string())),
            };

            match result {
                Ok(bytes) => {
                    debug!("Provider '{}' resolved {} ({} bytes)", id, kind, bytes.len());
                    return ChainOutcome {
                        fetched: Some((id.clone(), bytes)),
                        attempts,
                    };
                }
                Err(e) => {
                    debug!("Provider '{}' failed for {}: {}", id, kind, e);
                    attempts.push(ProviderAttempt {
                        provider: id.clone(),
                        failure: e.to_string(),
                    });
                }
            }
        }

        ChainOutcome {
            fetched: None,
            attempts,
        }
    }

    async fn invoke(
        &self,
        provider: Arc<dyn AssetProvider>,
        kind: AssetKind,
        parameters: &Parameters,
    ) -> Result<AssetBytes, ProviderError> {
        let parameters = parameters.clone();
        let mut handle =
            tokio::spawn(async move { provider.resolve(kind, &parameters).await });

        let bytes = match tokio::time::timeout(self.timeout, &mut handle).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_error)) => return Err(ProviderError::Panicked(join_error.to_string())),
            Err(_) => {
                handle.abort();
                return Err(ProviderError::Timeout(self.timeout.as_millis() as u64));
            }
        };

        if bytes.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(bytes)
    }
}
