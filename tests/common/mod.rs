pub mod fixtures;

use deckforge::types::{NotesMap, SlideSpec};
use deckforge::{DeckPipeline, PipelineError, RunReport};
use std::path::PathBuf;
use tempfile::TempDir;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A deck written to a scratch directory, plus the run report.
pub struct GeneratedDeck {
    pub dir: TempDir,
    pub output: PathBuf,
    pub xml: String,
    pub report: RunReport,
}

impl GeneratedDeck {
    /// Parses the saved document; panics on malformed XML.
    pub fn document(&self) -> roxmltree::Document<'_> {
        roxmltree::Document::parse(&self.xml).expect("saved deck is well-formed XML")
    }

    /// Number of `p:sld` elements in the saved document.
    pub fn slide_count(&self) -> usize {
        self.document()
            .descendants()
            .filter(|n| n.tag_name().name() == "sld")
            .count()
    }

    /// Titles in document order, read back from the title placeholders.
    pub fn slide_titles(&self) -> Vec<String> {
        let doc = self.document();
        doc.descendants()
            .filter(|n| n.tag_name().name() == "ph" && n.attribute("type") == Some("title"))
            .filter_map(|ph| {
                ph.ancestors()
                    .find(|a| a.tag_name().name() == "sp")?
                    .descendants()
                    .find(|n| n.tag_name().name() == "t")?
                    .text()
                    .map(str::to_string)
            })
            .collect()
    }

    /// Scratch path under the run directory, for asset targets.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

/// Runs `pipeline` over `slides` into a fresh temp directory.
pub async fn generate_deck(
    pipeline: &DeckPipeline,
    dir: TempDir,
    slides: Vec<SlideSpec>,
    notes: &NotesMap,
) -> Result<GeneratedDeck, PipelineError> {
    let output = dir.path().join("deck.xml");
    let report = pipeline.generate_to_file(slides, notes, &output).await?;
    let xml = std::fs::read_to_string(&output)?;
    Ok(GeneratedDeck {
        dir,
        output,
        xml,
        report,
    })
}
