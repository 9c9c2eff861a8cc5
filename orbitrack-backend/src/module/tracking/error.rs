///! Error types for the tracking engine
use thiserror::Error;

use super::types::CatalogId;
use crate::module::propagation::PropagationError;

/// A record that failed structural validation or field decoding
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElementSetError {
    #[error("line {line} is malformed: {reason}")]
    Malformed { line: u8, reason: String },

    #[error("catalog id is not an integer: {0:?}")]
    CatalogId(String),

    #[error("field {field} could not be decoded from {raw:?}")]
    Field { field: &'static str, raw: String },
}

/// Failure of one endpoint; logged and skipped
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("body of {url} could not be read: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Ingestion only fails when the built-in fallback cannot be used
#[derive(Debug, Clone, Error)]
pub enum IngestionError {
    #[error("fallback element set is invalid: {0}")]
    FallbackElements(#[source] ElementSetError),

    #[error("fallback element set could not be bound: {0}")]
    FallbackPropagator(#[source] PropagationError),
}

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("satellite {0} not found")]
    NotFound(CatalogId),

    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error("no catalog snapshot is available")]
    CatalogUnavailable,

    #[error(transparent)]
    ElementSet(#[from] ElementSetError),

    #[error(transparent)]
    Propagation(#[from] PropagationError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("query task failed: {0}")]
    Task(String),
}

impl TrackingError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TrackingError::NotFound(_))
    }
}
