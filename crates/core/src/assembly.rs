use crate::transition::TransitionInjector;
use deckforge_traits::{DocumentBackend, DocumentError, TextRole};
use deckforge_types::{Deck, PlacedContent, Placement, Rect, Region};
use log::{debug, warn};
use serde::Serialize;
use std::path::Path;

/// What happened to one slide's transition during assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum TransitionStatus {
    NotRequested,
    Applied,
    /// The fragment failed validation or the backend refused it.
    Skipped(String),
}

/// Writes every slide of `deck` to `backend`, in order.
///
/// Returns one [`TransitionStatus`] per slide. A bad transition fragment only
/// costs that slide its transition. An image the backend cannot embed is
/// dropped with a warning. Structural backend failures (starting the document,
/// adding a slide) are returned as errors.
pub fn assemble<B: DocumentBackend + ?Sized>(
    deck: &Deck,
    backend: &mut B,
    injector: &TransitionInjector,
) -> Result<Vec<TransitionStatus>, DocumentError> {
    backend.begin_document(deck.canvas)?;

    let mut statuses = Vec::with_capacity(deck.slides.len());
    for (ordinal, slide) in deck.slides.iter().enumerate() {
        let index = backend.add_slide()?;

        for placement in &slide.placements {
            write_placement(backend, index, placement)?;
        }

        if let Some(notes) = &slide.notes {
            backend.set_notes(index, notes)?;
        }

        let status = match injector.apply_transition(slide) {
            Ok(None) => TransitionStatus::NotRequested,
            Ok(Some(fragment)) => match backend.append_fragment(index, &fragment) {
                Ok(()) => {
                    debug!("Slide {}: {} transition applied", ordinal + 1, fragment.root_name());
                    TransitionStatus::Applied
                }
                Err(e) => {
                    warn!("Slide {}: backend rejected transition: {}", ordinal + 1, e);
                    TransitionStatus::Skipped(e.to_string())
                }
            },
            Err(e) => {
                warn!("Slide {}: malformed transition markup: {}", ordinal + 1, e);
                TransitionStatus::Skipped(e.to_string())
            }
        };
        statuses.push(status);
    }
    Ok(statuses)
}

fn write_placement<B: DocumentBackend + ?Sized>(
    backend: &mut B,
    slide: usize,
    placement: &Placement,
) -> Result<(), DocumentError> {
    match &placement.content {
        PlacedContent::Title { text } => {
            backend.add_text(slide, placement.bounds, TextRole::Title, std::slice::from_ref(text))
        }
        PlacedContent::Text { lines } => {
            let role = if placement.region == Region::Caption {
                TextRole::Caption
            } else {
                TextRole::Body
            };
            backend.add_text(slide, placement.bounds, role, lines)
        }
        PlacedContent::Asset { path, .. } => {
            let bounds = fit_image(placement.bounds, path);
            match backend.add_image(slide, bounds, path) {
                Ok(()) => Ok(()),
                Err(DocumentError::NoSuchSlide(i)) => Err(DocumentError::NoSuchSlide(i)),
                Err(e) => {
                    warn!("Could not embed {}: {}", path.display(), e);
                    Ok(())
                }
            }
        }
    }
}

/// Shrinks `slot` to the image's aspect ratio when its header can be read.
fn fit_image(slot: Rect, path: &Path) -> Rect {
    match image::image_dimensions(path) {
        Ok((w, h)) if h > 0 => slot.fit_aspect(w as f32 / h as f32),
        _ => slot,
    }
}
