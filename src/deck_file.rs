use crate::error::PipelineError;
use deckforge_types::{Canvas, NotesMap, SlideSpec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// A deck as declared in a JSON file: an optional canvas and ordered slides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas: Option<Canvas>,
    pub slides: Vec<SlideSpec>,
}

impl DeckDeclaration {
    pub fn from_json(source: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        Self::from_json(&read(path.as_ref(), "deck")?)
    }
}

/// Loads a notes map: a JSON object of slide identifier to note text.
pub fn load_notes<P: AsRef<Path>>(path: P) -> Result<NotesMap, PipelineError> {
    Ok(serde_json::from_str(&read(path.as_ref(), "notes")?)?)
}

fn read(path: &Path, what: &str) -> Result<String, PipelineError> {
    fs::read_to_string(path).map_err(|e| {
        PipelineError::Io(io::Error::new(
            e.kind(),
            format!("Failed to read {} from '{}': {}", what, path.display(), e),
        ))
    })
}
