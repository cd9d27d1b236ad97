//! Error types for the math crate.

use thiserror::Error;

/// Errors from invalid mathematical operations.
///
/// All of these are synchronous, fail-fast signals at the call site;
/// the numeric pipeline never recovers or retries.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// Cross product was given a point operand.
    #[error("cross product requires two vectors")]
    CrossRequiresVectors,

    /// Matrix determinant is effectively zero.
    #[error("matrix is singular and cannot be inverted")]
    SingularMatrix,

    /// Checked component access outside the valid range.
    #[error("component index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of valid components.
        len: usize,
    },
}

/// Result type for math operations.
pub type Result<T> = std::result::Result<T, MathError>;
