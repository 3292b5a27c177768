//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Retrieval failures from the mock data sources.
///
/// These never propagate past the store boundary: the fetch orchestration
/// converts them into the per-domain error string that the UI observes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    #[error("Empty payload for {0}")]
    EmptyPayload(String),
}

/// Preference persistence errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed blob under key {key}: {reason}")]
    Malformed { key: String, reason: String },
}
