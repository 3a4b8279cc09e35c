//! Error types for editor operations.

use crate::storage::StoreError;
use thiserror::Error;

/// Errors surfaced to the embedding UI layer. All of them are recoverable:
/// the session state is left unchanged by the failing operation.
#[derive(Debug, Error)]
pub enum EditorError {
    /// An action the current selection or input cannot satisfy (blank stamp
    /// name, fewer than two shapes on group, non-group selection on ungroup,
    /// empty selection on delete).
    #[error("{0}")]
    UserInput(String),

    /// Malformed scene file on import.
    #[error("invalid scene file: {0}")]
    Format(String),

    /// The render surface is not ready to rasterize.
    #[error("render surface unavailable")]
    SurfaceUnavailable,

    /// Template store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
