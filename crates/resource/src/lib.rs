//! Asset providers that need platform facilities.
//!
//! ## Available Providers
//!
//! - [`FilesystemProvider`]: serves files from a base directory
//!
//! The in-memory provider from deckforge-traits is re-exported for convenience.

mod filesystem;

pub use filesystem::{FilesystemProvider, PATH_PARAMETER};

pub use deckforge_traits::InMemoryProvider;
