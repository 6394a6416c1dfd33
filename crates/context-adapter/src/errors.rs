//! Error types for the context adapter.

use thiserror::Error;
use webscribe_core_types::ContextId;

/// Adapter error enumeration
#[derive(Debug, Error, Clone)]
pub enum AdapterError {
    /// Operation against a context that has already been disposed
    #[error("Context disposed: {0}")]
    ContextDisposed(ContextId),
}
