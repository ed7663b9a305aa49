//! Error type shared by the scissors crate.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScissorsError {
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("unsupported channel count: {0} (expected 1, 2, 3 or 4)")]
    UnsupportedChannels(usize),

    #[error("pixel ({x}, {y}) could not be read")]
    PixelRead { x: usize, y: usize },

    #[error("boundary is not connected")]
    NotConnected,

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

pub type Result<T> = std::result::Result<T, ScissorsError>;
