//! Speaker-notes synchronization.
//!
//! Notes live in a static map keyed by slide identifier. A slide's identifier is
//! its declared `note_id`, or `NN-title-slug` derived from its 1-based position
//! and title. Every entry must land on exactly one slide; anything else is
//! reported, never silently dropped.

use deckforge_types::{Deck, NotesMap, SlideSpec};
use log::{debug, warn};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// The identifier notes are matched against for the slide at `ordinal` (1-based).
pub fn slide_identifier(ordinal: usize, spec: &SlideSpec) -> String {
    match &spec.note_id {
        Some(id) => id.as_str().to_string(),
        None => format!("{:02}-{}", ordinal, slug::slugify(&spec.title)),
    }
}

/// Coverage of a notes map against a deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotesCoverage {
    /// Map entries that matched no slide.
    pub unmatched_note_ids: Vec<String>,
    /// Identifiers of slides that got no note, in deck order.
    pub slides_without_notes: Vec<String>,
    /// Identifiers carried by more than one slide; their notes were not attached.
    pub ambiguous_ids: Vec<String>,
}

impl NotesCoverage {
    pub fn is_complete(&self) -> bool {
        self.unmatched_note_ids.is_empty()
            && self.slides_without_notes.is_empty()
            && self.ambiguous_ids.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct NotesOutcome {
    pub deck: Deck,
    pub coverage: NotesCoverage,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NotesSynchronizer;

impl NotesSynchronizer {
    pub fn new() -> Self {
        Self
    }

    pub fn attach_notes(&self, mut deck: Deck, notes: &NotesMap) -> NotesOutcome {
        let identifiers: Vec<String> = deck
            .slides
            .iter()
            .enumerate()
            .map(|(i, slide)| slide_identifier(i + 1, &slide.spec))
            .collect();

        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for id in &identifiers {
            *occurrences.entry(id.as_str()).or_default() += 1;
        }

        let mut coverage = NotesCoverage::default();
        let mut ambiguous = BTreeSet::new();
        for (slide, id) in deck.slides.iter_mut().zip(&identifiers) {
            let unique = occurrences.get(id.as_str()).copied() == Some(1);
            match notes.get(id) {
                Some(text) if unique => {
                    debug!("Attached notes to slide '{}'", id);
                    slide.notes = Some(text.clone());
                }
                Some(_) => {
                    ambiguous.insert(id.clone());
                    coverage.slides_without_notes.push(id.clone());
                }
                None => coverage.slides_without_notes.push(id.clone()),
            }
        }

        coverage.unmatched_note_ids = notes
            .keys()
            .filter(|key| !occurrences.contains_key(key.as_str()))
            .cloned()
            .collect();
        coverage.ambiguous_ids = ambiguous.into_iter().collect();

        if !coverage.unmatched_note_ids.is_empty() {
            warn!(
                "{} note(s) matched no slide: {}",
                coverage.unmatched_note_ids.len(),
                coverage.unmatched_note_ids.join(", ")
            );
        }
        if !coverage.ambiguous_ids.is_empty() {
            warn!(
                "Notes not attached, identifier shared by several slides: {}",
                coverage.ambiguous_ids.join(", ")
            );
        }
        if !coverage.slides_without_notes.is_empty() {
            warn!(
                "{} slide(s) without notes: {}",
                coverage.slides_without_notes.len(),
                coverage.slides_without_notes.join(", ")
            );
        }

        NotesOutcome { deck, coverage }
    }
}
