use thiserror::Error;

/// Errors returned by packet decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("packet slice error: {0}")]
    Slice(String),
    #[error("unsupported link type: {0}")]
    UnsupportedLinktype(i32),
}
