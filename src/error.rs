use thiserror::Error;

/// Failures that can happen between this crate and the two remote services.
///
/// None of these are fatal. Read paths turn them into [`crate::Resource::Error`];
/// write paths log them and leave state untouched.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Network failure, timeout, or a non-success HTTP status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote answered but the payload could not be decoded.
    #[error("malformed payload: {0}")]
    Deserialization(String),

    /// The requested catalog volume or document does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A document store write (add, update, delete) failed.
    #[error("store write failed: {0}")]
    RemoteWrite(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type ReaderResult<T> = Result<T, ReaderError>;

impl From<reqwest::Error> for ReaderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ReaderError::Deserialization(e.to_string())
        } else {
            ReaderError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ReaderError {
    fn from(e: serde_json::Error) -> Self {
        ReaderError::Deserialization(e.to_string())
    }
}
