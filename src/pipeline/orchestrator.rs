use super::cache::{AssetCache, CacheStats};
use super::context::RunContext;
use super::report::{AssetReport, RunReport, SlideReport};
use super::resolver::ResolutionEngine;
use crate::config::ProviderChains;
use crate::error::PipelineError;
use deckforge_core::{
    NotesSynchronizer, TransitionInjector, XmlDeckDocument, assemble, slide_identifier,
};
use deckforge_layout::LayoutEngine;
use deckforge_traits::DocumentBackend;
use deckforge_types::{
    AssetResolution, Deck, NotesMap, PlacedSlide, ResolutionMap, ResolutionOutcome, SlideSpec,
};
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::task;

/// Cooperative cancellation for a running pipeline.
///
/// Aborting stops the producer before the next slide and makes the run
/// return [`PipelineError::Aborted`]. Assets already written stay on disk.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One slide after resolution and layout.
#[derive(Debug, Clone)]
pub struct ComposedSlide {
    pub slide: PlacedSlide,
    /// One resolution per asset request, in request order.
    pub resolutions: Vec<AssetResolution>,
}

/// The layout stage's output, in slide order.
#[derive(Debug, Clone)]
pub struct ComposedDeck {
    pub deck: Deck,
    pub resolutions: Vec<Vec<AssetResolution>>,
    pub cache: CacheStats,
}

/// The slide deck generation pipeline.
///
/// A producer feeds `(index, SlideSpec)` into a bounded channel, workers
/// resolve each slide's assets and compose its layout, and a consumer puts
/// the results back in slide order before notes and assembly run.
#[derive(Debug)]
pub struct DeckPipeline {
    engine: Arc<ResolutionEngine>,
    chains: Arc<ProviderChains>,
    layout: LayoutEngine,
    max_concurrency: usize,
    reuse_existing_assets: bool,
    abort: AbortHandle,
}

impl DeckPipeline {
    pub(crate) fn new(
        engine: ResolutionEngine,
        chains: ProviderChains,
        layout: LayoutEngine,
        max_concurrency: usize,
        reuse_existing_assets: bool,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            chains: Arc::new(chains),
            layout,
            max_concurrency: max_concurrency.max(1),
            reuse_existing_assets,
            abort: AbortHandle::new(),
        }
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    /// Resolves assets and composes the layout of every slide.
    ///
    /// Each call gets its own asset cache.
    pub async fn compose_deck(&self, slides: Vec<SlideSpec>) -> Result<ComposedDeck, PipelineError> {
        let total = slides.len();
        let num_workers = self.max_concurrency.min(total.max(1));
        let channel_buffer_size = num_workers;

        let context = RunContext {
            engine: Arc::clone(&self.engine),
            chains: Arc::clone(&self.chains),
            cache: Arc::new(AssetCache::new()),
            reuse_existing_assets: self.reuse_existing_assets,
        };

        info!(
            "Composing {} slide(s) with {} worker(s).",
            total, num_workers
        );

        let (tx1, rx1) = async_channel::bounded::<(usize, SlideSpec)>(channel_buffer_size);
        let (tx2, rx2) = async_channel::bounded::<(usize, ComposedSlide)>(channel_buffer_size);

        // --- STAGE 1: Producer ---
        let abort = self.abort.clone();
        let producer_handle = task::spawn(async move {
            for (i, spec) in slides.into_iter().enumerate() {
                if abort.is_aborted() {
                    warn!("[PRODUCER] Abort requested, stopping before slide {}.", i + 1);
                    break;
                }
                debug!("[PRODUCER] Sending slide #{} to workers.", i + 1);
                if tx1.send((i, spec)).await.is_err() {
                    warn!("[PRODUCER] Worker channel closed, stopping producer.");
                    break;
                }
            }
        });

        // --- STAGE 2: Slide workers ---
        let mut worker_handles = Vec::with_capacity(num_workers);
        for worker_id in 0..num_workers {
            let rx = rx1.clone();
            let tx = tx2.clone();
            let context = context.clone();
            let layout = self.layout.clone();
            let abort = self.abort.clone();

            worker_handles.push(task::spawn(async move {
                debug!("[WORKER-{}] Started.", worker_id);
                while let Ok((index, spec)) = rx.recv().await {
                    if abort.is_aborted() {
                        break;
                    }
                    let composed = compose_slide(&context, &layout, index, spec).await;
                    if tx.send((index, composed)).await.is_err() {
                        warn!("[WORKER-{}] Consumer channel closed.", worker_id);
                        break;
                    }
                }
                debug!("[WORKER-{}] Shutting down.", worker_id);
            }));
        }
        drop(tx2);
        drop(rx1);

        // --- STAGE 3: Consumer, reorders by slide index ---
        let mut buffer = BTreeMap::new();
        let mut next_slide = 0;
        let mut deck = Deck::new(self.layout.canvas());
        let mut resolutions = Vec::with_capacity(total);

        while let Ok((index, composed)) = rx2.recv().await {
            buffer.insert(index, composed);
            while let Some(composed) = buffer.remove(&next_slide) {
                debug!(
                    "[CONSUMER] Slide #{} composed as {:?}.",
                    next_slide + 1,
                    composed.slide.variant
                );
                deck.push(composed.slide);
                resolutions.push(composed.resolutions);
                next_slide += 1;
            }
        }

        producer_handle.await?;
        for handle in worker_handles {
            handle.await?;
        }

        if self.abort.is_aborted() {
            warn!("Run aborted after {} of {} slide(s).", next_slide, total);
            return Err(PipelineError::Aborted);
        }
        if next_slide != total {
            return Err(PipelineError::Task(format!(
                "only {} of {} slides were composed",
                next_slide, total
            )));
        }

        Ok(ComposedDeck {
            deck,
            resolutions,
            cache: context.cache.stats(),
        })
    }

    /// Runs the whole pipeline and saves the result through `backend`.
    ///
    /// Only a failing `save` (or a structural backend failure) is fatal.
    pub async fn generate<B: DocumentBackend + ?Sized>(
        &self,
        slides: Vec<SlideSpec>,
        notes: &NotesMap,
        backend: &mut B,
        output: &Path,
    ) -> Result<RunReport, PipelineError> {
        let start = Instant::now();
        info!("Starting run: {} slide(s) -> {}", slides.len(), output.display());

        let composed = self.compose_deck(slides).await?;
        let notes_outcome = NotesSynchronizer::new().attach_notes(composed.deck, notes);
        let deck = notes_outcome.deck;

        let transitions = assemble(&deck, backend, &TransitionInjector::new())?;
        if let Err(e) = backend.save(output) {
            error!("Failed to save {} with {}: {}", output.display(), backend.name(), e);
            return Err(e.into());
        }

        let slides = deck
            .slides
            .iter()
            .zip(composed.resolutions.iter())
            .zip(transitions)
            .enumerate()
            .map(|(i, ((slide, resolutions), transition))| SlideReport {
                ordinal: i + 1,
                identifier: slide_identifier(i + 1, &slide.spec),
                title: slide.spec.title.clone(),
                variant: slide.variant,
                assets: resolutions.iter().map(AssetReport::from).collect(),
                transition,
                notes_attached: slide.notes.is_some(),
            })
            .collect();

        let report = RunReport {
            output: output.to_path_buf(),
            slides,
            notes: notes_outcome.coverage,
            cache: composed.cache,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        report.log_summary();
        Ok(report)
    }

    /// Runs the pipeline into an [`XmlDeckDocument`] saved at `output`.
    ///
    /// The output directory must already exist.
    pub async fn generate_to_file<P: AsRef<Path>>(
        &self,
        slides: Vec<SlideSpec>,
        notes: &NotesMap,
        output: P,
    ) -> Result<RunReport, PipelineError> {
        let mut document = XmlDeckDocument::new();
        self.generate(slides, notes, &mut document, output.as_ref())
            .await
    }
}

async fn compose_slide(
    context: &RunContext,
    layout: &LayoutEngine,
    index: usize,
    spec: SlideSpec,
) -> ComposedSlide {
    let mut by_fingerprint = ResolutionMap::new();
    let mut resolutions = Vec::with_capacity(spec.asset_requests.len());

    for request in &spec.asset_requests {
        let resolution = context.resolve_request(request).await;
        if let ResolutionOutcome::Unresolved { reason } = &resolution.outcome {
            warn!(
                "Slide {} '{}': {} asset unresolved ({}), parameters {}",
                index + 1,
                spec.title,
                request.kind,
                reason,
                request.parameters
            );
        }
        by_fingerprint.insert(request.fingerprint(), resolution.clone());
        resolutions.push(resolution);
    }

    let slide = layout.compose(&spec, &by_fingerprint);
    ComposedSlide { slide, resolutions }
}
