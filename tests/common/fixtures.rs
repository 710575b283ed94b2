use async_trait::async_trait;
use deckforge::ProviderError;
use deckforge::traits::{AssetBytes, AssetProvider};
use deckforge::types::{AssetKind, AssetRequest, Parameters, SlideSpec};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Smallest bytes a provider can hand back; not a decodable image.
pub const FAKE_PNG: &[u8] = b"\x89PNG fixture bytes";

/// Returns fixed bytes and counts how often it was asked.
#[derive(Debug, Default)]
pub struct CountingProvider {
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl CountingProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Sleeps before answering, so concurrent slides finish out of order.
    pub fn delayed(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay: Some(delay),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetProvider for CountingProvider {
    async fn resolve(
        &self,
        _kind: AssetKind,
        parameters: &Parameters,
    ) -> Result<AssetBytes, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let per_request = parameters
            .get_str("delay_ms")
            .and_then(|ms| ms.parse().ok())
            .map(Duration::from_millis);
        if let Some(delay) = per_request.or(self.delay) {
            tokio::time::sleep(delay).await;
        }
        Ok(Arc::new(FAKE_PNG.to_vec()))
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Always fails with the given error, counting invocations.
#[derive(Debug)]
pub struct FailingProvider {
    error: ProviderError,
    calls: AtomicUsize,
}

impl FailingProvider {
    pub fn new(error: ProviderError) -> Arc<Self> {
        Arc::new(Self {
            error,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetProvider for FailingProvider {
    async fn resolve(
        &self,
        _kind: AssetKind,
        _parameters: &Parameters,
    ) -> Result<AssetBytes, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Never answers within any reasonable timeout.
#[derive(Debug, Default)]
pub struct HangingProvider;

#[async_trait]
impl AssetProvider for HangingProvider {
    async fn resolve(
        &self,
        _kind: AssetKind,
        _parameters: &Parameters,
    ) -> Result<AssetBytes, ProviderError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Arc::new(FAKE_PNG.to_vec()))
    }

    fn name(&self) -> &'static str {
        "hanging"
    }
}

/// A chart request writing into `dir`.
pub fn chart_request(dir: &Path, name: &str) -> AssetRequest {
    AssetRequest::new(
        AssetKind::Chart,
        Parameters::new().with("type", "bar").with("series", name),
        dir.join("assets").join(format!("{}.png", name)),
    )
}

/// An avatar request writing into `dir`.
pub fn avatar_request(dir: &Path, seed: &str) -> AssetRequest {
    AssetRequest::new(
        AssetKind::Avatar,
        Parameters::new().with("seed", seed),
        dir.join("assets").join(format!("avatar-{}.png", seed)),
    )
}

/// The quarterly revenue slide used across the end-to-end tests.
pub fn revenue_slide(dir: &Path) -> SlideSpec {
    SlideSpec::new("Revenue")
        .with_content(["Q1: 12M", "Q2: 15M"])
        .with_asset(chart_request(dir, "revenue"))
}

/// Plain text slides titled "Slide 1" .. "Slide n".
pub fn numbered_slides(count: usize) -> Vec<SlideSpec> {
    (1..=count)
        .map(|i| SlideSpec::new(format!("Slide {}", i)).with_content([format!("Point {}", i)]))
        .collect()
}
