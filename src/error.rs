use std::path::PathBuf;

use thiserror::Error;

/// Failures talking to the remote product/stock service.
#[derive(Debug, Error)]
pub enum StockApiError {
    #[error("request to `{url}` failed: {source}")]
    Transport { url: String, source: reqwest::Error },
    #[error("`{url}` answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode response from `{url}`: {source}")]
    Decode { url: String, source: reqwest::Error },
    #[error("invalid stock service url `{0}`")]
    InvalidUrl(String),
}

/// Failures reading or writing the persisted cart slot.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not access cart storage `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("could not serialize cart: {0}")]
    Serialize(serde_json::Error),
    #[error("stored cart in `{path}` is not valid: {source}")]
    Deserialize { path: PathBuf, source: serde_json::Error },
}

/// Everything that can go wrong inside a cart operation.
///
/// None of these escape [`crate::clients::CartStore`]; they are turned into
/// notifications and handed to the diagnostics sink.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("stock service error: {0}")]
    Remote(#[from] StockApiError),
    #[error("cart storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
