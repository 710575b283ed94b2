//! Declarative slide input and the placed output of layout composition.

use crate::asset::{AssetKind, AssetRequest};
use crate::geometry::{Canvas, Rect};
use crate::ids::SlideId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// How the viewer animates into a slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionPolicy {
    Fade {
        duration_ms: u32,
    },
    /// Extended-vocabulary morph, emitted together with a baseline fade fallback.
    Morph {
        duration_ms: u32,
    },
    #[default]
    None,
    /// Author-supplied transition markup, inserted verbatim once it parses.
    Custom {
        markup: String,
    },
}

/// One slide as authored in a deck declaration. Read-only input to the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideSpec {
    pub title: String,
    #[serde(default, rename = "content")]
    pub content_blocks: Vec<String>,
    #[serde(default, rename = "assets")]
    pub asset_requests: Vec<AssetRequest>,
    #[serde(default)]
    pub transition: TransitionPolicy,
    /// Explicit identifier for speaker-notes matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_id: Option<SlideId>,
}

impl SlideSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_content<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_blocks.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn with_asset(mut self, request: AssetRequest) -> Self {
        self.asset_requests.push(request);
        self
    }

    pub fn with_transition(mut self, transition: TransitionPolicy) -> Self {
        self.transition = transition;
        self
    }

    pub fn with_note_id(mut self, id: impl Into<SlideId>) -> Self {
        self.note_id = Some(id.into());
        self
    }
}

/// The fixed set of slide arrangements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutVariant {
    TextOnly,
    TextWithAsset,
    AssetOnly,
    Grid,
}

/// Named area of a slide that a placement fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "region")]
pub enum Region {
    Title,
    Text,
    /// The n-th resolved asset of a non-grid slide.
    Asset { index: usize },
    Cell { row: usize, column: usize },
    /// Text shown under a grid.
    Caption,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PlacedContent {
    Title { text: String },
    Text { lines: Vec<String> },
    Asset { kind: AssetKind, path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub region: Region,
    pub bounds: Rect,
    pub content: PlacedContent,
}

/// A slide after layout composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedSlide {
    pub spec: SlideSpec,
    pub variant: LayoutVariant,
    pub placements: Vec<Placement>,
    /// Speaker notes, filled in by notes synchronization.
    pub notes: Option<String>,
}

impl PlacedSlide {
    /// Paths of every asset that made it into the geometry, in placement order.
    pub fn asset_paths(&self) -> impl Iterator<Item = &Path> {
        self.placements.iter().filter_map(|p| match &p.content {
            PlacedContent::Asset { path, .. } => Some(path.as_path()),
            _ => None,
        })
    }

    pub fn placement(&self, region: Region) -> Option<&Placement> {
        self.placements.iter().find(|p| p.region == region)
    }
}

/// The ordered slides of one run plus the canvas they share.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deck {
    pub canvas: Canvas,
    pub slides: Vec<PlacedSlide>,
}

impl Deck {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            slides: Vec::new(),
        }
    }

    pub fn push(&mut self, slide: PlacedSlide) {
        self.slides.push(slide);
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// Static mapping from slide identifier to speaker-note text.
pub type NotesMap = BTreeMap<String, String>;
