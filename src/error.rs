//! Error taxonomy for the decode cascade.
//!
//! A cascade that finds nothing is not an error: that outcome is
//! `DecodeResult::NotFound`. Only malformed inputs surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CascadeError {
    /// Buffer length disagrees with `width * height * channels`.
    #[error("buffer length {actual} does not match declared dimensions (expected {expected})")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Strategy id outside the registry. Skipped by order parsing.
    #[error("unknown strategy id {0}")]
    InvalidStrategyId(u8),

    #[error("invalid cascade configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = CascadeError> = std::result::Result<T, E>;
