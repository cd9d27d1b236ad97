#![warn(missing_docs)]

//! Math types for the lucent ray-tracing core.
//!
//! Homogeneous 4-component tuples (points and vectors), RGB colours,
//! fixed-dimension matrices with cofactor determinants and adjugate
//! inversion, and affine transforms that carry their inverse and
//! inverse-transpose as always-consistent cached values.

pub mod colour;
pub mod error;
pub mod matrix;
pub mod transform;
pub mod tuple;

pub use colour::Colour;
pub use error::{MathError, Result};
pub use matrix::{Matrix, Matrix2, Matrix3, Matrix4};
pub use transform::Transform;
pub use tuple::Tuple;

/// Comparison tolerance used for all epsilon equality in the core.
///
/// Absorbs floating-point drift across transform chains; also the
/// threshold below which a determinant counts as singular and a ray
/// direction component counts as parallel to an axis slab.
pub const EPSILON: f64 = 1e-5;

/// Scalar epsilon equality.
///
/// The exact-equality arm keeps equal infinities equal: `∞ - ∞` is NaN,
/// which would otherwise fail the tolerance check. Bounding boxes use
/// infinite extents as ordinary values.
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() < EPSILON
}
