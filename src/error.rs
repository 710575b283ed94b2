// src/error.rs
use deckforge_layout::LayoutError;
use deckforge_traits::DocumentError;
use thiserror::Error;

/// Errors that stop a run.
///
/// Provider failures, unresolved assets, rejected transition fragments and
/// notes mismatches are not errors; they end up in the `RunReport`.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document backend failed: {0}")]
    Document(#[from] DocumentError),

    #[error("Layout configuration rejected: {0}")]
    Layout(#[from] LayoutError),

    #[error("Pipeline task failed: {0}")]
    Task(String),

    #[error("Run aborted")]
    Aborted,
}

impl From<config::ConfigError> for PipelineError {
    fn from(e: config::ConfigError) -> Self {
        PipelineError::Config(e.to_string())
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(e: tokio::task::JoinError) -> Self {
        PipelineError::Task(e.to_string())
    }
}
