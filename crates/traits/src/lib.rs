pub mod document;
pub mod markup;
pub mod provider;

pub use document::{DocumentBackend, DocumentError, TextRole};
pub use markup::{FragmentError, MarkupFragment};
pub use provider::{AssetBytes, AssetProvider, InMemoryProvider, ProviderError};
