//! # deckforge
//!
//! Slide deck generation from declarative slide definitions.
//!
//! Each slide's visual assets are resolved through statically ordered
//! provider chains, cached per run and written to disk. A layout variant is
//! picked from what actually resolved, then speaker notes and transition
//! markup are attached before the deck is saved through a
//! [`DocumentBackend`](deckforge_traits::DocumentBackend).
//!
//! ```no_run
//! use deckforge::{PipelineBuilder, InMemoryProvider};
//! use deckforge::types::{AssetKind, NotesMap, SlideSpec};
//!
//! # async fn run() -> Result<(), deckforge::PipelineError> {
//! let pipeline = PipelineBuilder::new()
//!     .with_provider("charts", InMemoryProvider::new())
//!     .with_chain(AssetKind::Chart, ["charts"])
//!     .build()?;
//! let report = pipeline
//!     .generate_to_file(vec![SlideSpec::new("Hello")], &NotesMap::new(), "deck.xml")
//!     .await?;
//! assert_eq!(report.slides.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod deck_file;
pub mod error;
pub mod pipeline;

pub use deckforge_core as core;
pub use deckforge_layout as layout;
pub use deckforge_traits as traits;
pub use deckforge_types as types;

pub use config::{PipelineConfig, ProviderChains, ProviderDecl};
pub use deck_file::{DeckDeclaration, load_notes};
pub use error::PipelineError;
pub use pipeline::{
    AbortHandle, AssetCache, DeckPipeline, PipelineBuilder, ResolutionEngine, RunReport,
};

pub use deckforge_core::XmlDeckDocument;
pub use deckforge_resource::FilesystemProvider;
pub use deckforge_traits::{AssetProvider, InMemoryProvider, ProviderError};
