//! Error types for pile generation and decoding.

use thiserror::Error;

/// Errors that can occur while building, writing or reading a pile.
#[derive(Error, Debug)]
pub enum PileError {
    /// Filesystem or stream error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A byte buffer or file does not have the expected length.
    #[error("invalid pile size: expected {expected} bytes, got {actual}")]
    InvalidSize { expected: usize, actual: usize },

    /// A decoded value does not match the generating formula.
    #[error(
        "{grid} value mismatch at row {row}, column {column}, band {band}: expected {expected}, got {actual}"
    )]
    ValueMismatch {
        grid: &'static str,
        row: usize,
        column: usize,
        band: usize,
        expected: f32,
        actual: f32,
    },

    /// A grid definition could not be parsed.
    #[error("invalid grid descriptor: {0}")]
    InvalidDescriptor(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl PileError {
    /// Create an InvalidDescriptor error.
    pub fn invalid_descriptor(msg: impl Into<String>) -> Self {
        Self::InvalidDescriptor(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<serde_yaml::Error> for PileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for pile operations.
pub type Result<T> = std::result::Result<T, PileError>;
