//! Error types for the codec's public API.
//!
//! These errors model precondition violations at the boundary of the
//! library (bad shapes, malformed shift matrices, degenerate parameters).
//! Saturation and decoder non-convergence are not errors; see
//! [`crate::decoder::DecoderOutput`].

use thiserror::Error;

/// Error returned by the codec's public entry points.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// A vector did not have the length required by the shift matrix.
    #[error("expected length {expected}, got {actual}")]
    ShapeMismatch {
        /// Length required by the shift matrix.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
    /// A shift matrix entry was not `-1` or in `[0, b)` before normalization,
    /// or the flat entry list did not match `m * n`.
    #[error("invalid shift matrix: {0}")]
    InvalidShiftMatrix(String),
    /// The block size `b` was zero.
    #[error("block size must be positive")]
    InvalidBlockSize,
    /// The parity columns of the shift matrix are not double-diagonal, so no
    /// double-diagonal back-substitution encoder can be built from it.
    #[error("shift matrix parity columns are not double-diagonal")]
    NotDoubleDiagonal,
    /// `max_iter` was zero.
    #[error("max_iter must be at least 1")]
    InvalidIterationBudget,
    /// `initial_llr` was not a positive finite number.
    #[error("initial_llr must be positive and finite, got {0}")]
    NonPositiveLlr(f64),
}

/// A [`Result`] using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
