//! Error types for the shape hierarchy.

use thiserror::Error;

/// Errors from invalid shape operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    /// A handle did not resolve to a shape in this arena.
    #[error("shape handle does not belong to this arena")]
    UnknownShape,

    /// A child operation was attempted on a non-group shape.
    #[error("shape is not a group")]
    NotAGroup,

    /// A parent assignment would make a shape its own ancestor.
    #[error("parent assignment would form a cycle")]
    CycleDetected,

    /// A shape serving as a CSG operand was offered to another parent.
    /// CSG nodes have exactly two operands and cannot give one up.
    #[error("shape is already an operand of a CSG node")]
    OperandInUse,

    /// A surface normal was requested of a group or CSG shape,
    /// which have no surface of their own.
    #[error("composite shapes have no surface normal")]
    CompositeHasNoNormal,
}

/// Result type for shape operations.
pub type Result<T> = std::result::Result<T, ShapeError>;
