use super::cache::CacheStats;
use deckforge_core::{NotesCoverage, TransitionStatus};
use deckforge_types::{
    AssetKind, AssetResolution, LayoutVariant, ProviderAttempt, ProviderId, ResolutionOutcome,
};
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;

/// Provenance of one asset request on one slide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetReport {
    pub kind: AssetKind,
    pub target: PathBuf,
    pub outcome: ResolutionOutcome,
    pub provider: Option<ProviderId>,
    pub attempts: Vec<ProviderAttempt>,
}

impl From<&AssetResolution> for AssetReport {
    fn from(resolution: &AssetResolution) -> Self {
        Self {
            kind: resolution.request.kind,
            target: resolution.request.target_path.clone(),
            outcome: resolution.outcome.clone(),
            provider: resolution.provider_used().cloned(),
            attempts: resolution.attempts.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideReport {
    /// 1-based position in the deck.
    pub ordinal: usize,
    /// The identifier notes were matched against.
    pub identifier: String,
    pub title: String,
    pub variant: LayoutVariant,
    pub assets: Vec<AssetReport>,
    pub transition: TransitionStatus,
    pub notes_attached: bool,
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub output: PathBuf,
    pub slides: Vec<SlideReport>,
    pub notes: NotesCoverage,
    pub cache: CacheStats,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn resolved_assets(&self) -> usize {
        self.assets()
            .filter(|a| matches!(a.outcome, ResolutionOutcome::Resolved { .. }))
            .count()
    }

    pub fn unresolved_assets(&self) -> usize {
        self.assets()
            .filter(|a| matches!(a.outcome, ResolutionOutcome::Unresolved { .. }))
            .count()
    }

    pub fn skipped_transitions(&self) -> usize {
        self.slides
            .iter()
            .filter(|s| matches!(s.transition, TransitionStatus::Skipped(_)))
            .count()
    }

    fn assets(&self) -> impl Iterator<Item = &AssetReport> {
        self.slides.iter().flat_map(|s| s.assets.iter())
    }

    /// Emits the end-of-run summary on the log stream.
    pub fn log_summary(&self) {
        info!(
            "Wrote {} slide(s) to {} in {} ms",
            self.slides.len(),
            self.output.display(),
            self.elapsed_ms
        );
        info!(
            "Assets: {} resolved, {} unresolved (cache: {} hit(s), {} miss(es))",
            self.resolved_assets(),
            self.unresolved_assets(),
            self.cache.hits,
            self.cache.misses
        );
        for slide in &self.slides {
            for asset in &slide.assets {
                if let ResolutionOutcome::Unresolved { reason } = &asset.outcome {
                    warn!(
                        "  slide {} '{}': {} -> omitted ({}, {} attempt(s))",
                        slide.ordinal,
                        slide.title,
                        asset.target.display(),
                        reason,
                        asset.attempts.len()
                    );
                }
            }
        }
        let skipped = self.skipped_transitions();
        if skipped > 0 {
            warn!("{} transition(s) skipped", skipped);
        }
        if self.notes.is_complete() {
            info!("Speaker notes attached to every slide");
        } else {
            warn!(
                "Speaker notes: {} slide(s) without notes, {} unmatched, {} ambiguous",
                self.notes.slides_without_notes.len(),
                self.notes.unmatched_note_ids.len(),
                self.notes.ambiguous_ids.len()
            );
        }
    }
}
