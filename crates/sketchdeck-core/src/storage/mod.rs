//! Key-value persistence for the template library.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("store error: {0}")]
    Other(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value store for the persisted template list.
///
/// The whole list is read and written as one JSON payload under a fixed
/// namespace key. Implementations may back this with memory, the filesystem,
/// or the embedding platform's local storage.
pub trait TemplateStore: Send + Sync {
    /// Read the payload stored under `key`, or None when absent.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write the payload stored under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove the payload stored under `key` (absent keys are not an error).
    fn remove(&self, key: &str) -> StoreResult<()>;
}
