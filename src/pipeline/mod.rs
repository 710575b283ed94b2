// src/pipeline/mod.rs
pub mod builder;
pub mod cache;
pub mod context;
pub mod orchestrator;
pub mod report;
pub mod resolver;

pub use builder::PipelineBuilder;
pub use cache::{AssetCache, CacheStats};
pub use orchestrator::{AbortHandle, ComposedDeck, ComposedSlide, DeckPipeline};
pub use report::{AssetReport, RunReport, SlideReport};
pub use resolver::{ChainOutcome, ResolutionEngine};
