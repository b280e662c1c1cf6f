use thiserror::Error;

/// Errors of the decoding surfaces. Engine operations themselves are total.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),
}
