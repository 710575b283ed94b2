use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Canvas must have a positive finite size, got {0:.2} x {1:.2}.")]
    InvalidCanvas(f32, f32),
    #[error("Invalid layout metrics: {0}")]
    InvalidMetrics(String),
}

pub mod config;
pub(crate) mod engine;
pub mod grid;
pub mod variant;

pub use self::config::LayoutMetrics;
pub use self::engine::LayoutEngine;
pub use self::variant::{ResolvedAsset, resolved_assets, select_variant};
