//! # deckforge-core
//!
//! Synchronous deck finishing stages:
//! - **transition**: transition markup fragments (fade, morph with fallback, custom)
//! - **notes**: speaker-notes matching and coverage reporting
//! - **assembly**: writing a placed deck to a [`DocumentBackend`]
//! - **xml_deck**: a flat-XML reference backend
//!
//! Nothing here performs network I/O; the only filesystem access is reading
//! image headers during assembly and [`XmlDeckDocument::save`].

pub mod assembly;
pub mod notes;
pub mod transition;
pub mod xml_deck;

pub use assembly::{TransitionStatus, assemble};
pub use notes::{NotesCoverage, NotesOutcome, NotesSynchronizer, slide_identifier};
pub use transition::{TransitionInjector, fade_speed};
pub use xml_deck::XmlDeckDocument;

pub use deckforge_traits::DocumentBackend;
