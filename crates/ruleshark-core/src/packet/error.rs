use thiserror::Error;

/// Errors returned by positional and by-name layer lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerError {
    #[error("layer not found in packet: {name}")]
    NotFound { name: String },
    #[error("layer index {index} out of range (packet has {len} layers)")]
    OutOfRange { index: usize, len: usize },
}
