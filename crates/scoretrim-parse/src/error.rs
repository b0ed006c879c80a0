//! Error types for the lopdf backend.
//!
//! Uses [`thiserror`] for derivation. [`BackendError`] carries lopdf failures
//! with the page and stage they happened in, and converts into
//! [`TrimError`] for callers of the facade.

use scoretrim_core::{Stage, TrimError};
use thiserror::Error;

/// Error type for backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The source bytes could not be parsed or decrypted.
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// A page could not be processed.
    #[error("{stage} error on page {page}: {message}")]
    Page {
        page: u32,
        stage: Stage,
        message: String,
    },

    /// A document-level step failed outside any single page.
    #[error("{stage} error: {message}")]
    Document { stage: Stage, message: String },

    /// A core library error.
    #[error(transparent)]
    Core(#[from] TrimError),
}

impl BackendError {
    pub(crate) fn page(page: u32, stage: Stage, message: impl Into<String>) -> Self {
        BackendError::Page {
            page,
            stage,
            message: message.into(),
        }
    }

    pub(crate) fn document(stage: Stage, message: impl Into<String>) -> Self {
        BackendError::Document {
            stage,
            message: message.into(),
        }
    }
}

impl From<BackendError> for TrimError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => TrimError::internal(Stage::Open, None, msg),
            BackendError::Page {
                page,
                stage,
                message,
            } => TrimError::internal(stage, Some(page), message),
            BackendError::Document { stage, message } => TrimError::internal(stage, None, message),
            BackendError::Core(e) => e,
        }
    }
}
