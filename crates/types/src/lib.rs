pub mod asset;
pub mod geometry;
pub mod ids;
pub mod resolution;
pub mod slide;

pub use asset::{AssetKind, AssetRequest, Fingerprint, Parameters, to_canonical_json};
pub use geometry::{Canvas, Rect};
pub use ids::{ProviderId, SlideId};
pub use resolution::{
    AssetResolution, AssetSource, ProviderAttempt, ResolutionMap, ResolutionOutcome,
    UnresolvedReason,
};
pub use slide::{
    Deck, LayoutVariant, NotesMap, PlacedContent, PlacedSlide, Placement, Region, SlideSpec,
    TransitionPolicy,
};
