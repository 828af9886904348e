//! error types for sealgate

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid seal config: {0}")]
    InvalidConfig(String),

    /// share rejected before reaching the accumulator, progress untouched
    #[error("invalid share encoding: {0}")]
    InvalidShareEncoding(String),

    /// threshold reached but reconstruction failed.
    /// accumulated shares have already been discarded when this is returned.
    #[error("failed to combine shares, unseal progress reset: {0}")]
    CombineFailed(#[from] CombineError),

    #[error("master secret unavailable: core is sealed")]
    Sealed,

    #[error("internal seal error: {0}")]
    Internal(String),
}

/// reasons a threshold-sized share set fails to reconstruct
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombineError {
    #[error("wrong share count: have {have}, need {need}")]
    WrongShareCount { have: usize, need: usize },

    #[error("share length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("share has zero x-coordinate")]
    ZeroCoordinate,

    #[error("duplicate x-coordinate {0}")]
    DuplicateCoordinate(u8),

    #[error("reconstructed secret failed checksum")]
    ChecksumMismatch,
}
