//! DocumentBackend trait for the presentation format being written.
//!
//! The assembly stage drives a backend slide by slide; the backend owns the
//! serialization format. Raw fragment insertion is the only way slide-level
//! markup reaches the document, and fragments are validated before they
//! arrive (see [`MarkupFragment`]).

use crate::markup::{FragmentError, MarkupFragment};
use deckforge_types::{Canvas, Rect};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("No slide at index {0}")]
    NoSuchSlide(usize),

    #[error("Document was not started")]
    NotStarted,

    #[error("Fragment rejected: {0}")]
    Fragment(#[from] FragmentError),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a text box holds, so the backend can pick a style for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Body,
    Caption,
}

impl TextRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextRole::Title => "title",
            TextRole::Body => "body",
            TextRole::Caption => "caption",
        }
    }
}

/// A writable presentation document.
///
/// Slides are addressed by the index returned from [`add_slide`](Self::add_slide).
pub trait DocumentBackend {
    /// Starts a new document sized to `canvas`. Discards any previous content.
    fn begin_document(&mut self, canvas: Canvas) -> Result<(), DocumentError>;

    fn add_slide(&mut self) -> Result<usize, DocumentError>;

    fn add_text(
        &mut self,
        slide: usize,
        bounds: Rect,
        role: TextRole,
        lines: &[String],
    ) -> Result<(), DocumentError>;

    fn add_image(&mut self, slide: usize, bounds: Rect, path: &Path) -> Result<(), DocumentError>;

    fn set_notes(&mut self, slide: usize, text: &str) -> Result<(), DocumentError>;

    /// Appends a fragment to the slide's own XML tree.
    fn append_fragment(
        &mut self,
        slide: usize,
        fragment: &MarkupFragment,
    ) -> Result<(), DocumentError>;

    fn save(&mut self, path: &Path) -> Result<(), DocumentError>;

    fn name(&self) -> &'static str;
}
