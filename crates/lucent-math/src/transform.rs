//! Affine transforms carrying cached inverse and inverse-transpose.
//!
//! Every constructor computes all three matrices together, so a
//! `Transform` value can never expose a stale cache. Mutating a shape's
//! transform means replacing the whole value.

use crate::error::Result;
use crate::matrix::Matrix4;
use crate::tuple::Tuple;

/// A 4×4 affine transformation with its inverse and inverse-transpose.
///
/// Invariant: `matrix * inverse ≈ identity` and
/// `inverse_transpose == inverse.transpose()` at all times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix4,
    inverse: Matrix4,
    inverse_transpose: Matrix4,
}

impl Transform {
    /// Wrap an arbitrary matrix, computing its inverse.
    ///
    /// Fails if the matrix is singular.
    pub fn new(matrix: Matrix4) -> Result<Self> {
        let inverse = matrix.invert()?;
        Ok(Self::from_parts(matrix, inverse))
    }

    fn from_parts(matrix: Matrix4, inverse: Matrix4) -> Self {
        Self {
            matrix,
            inverse,
            inverse_transpose: inverse.transpose(),
        }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::from_parts(Matrix4::identity(), Matrix4::identity())
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let m = Matrix4::new([
            [1.0, 0.0, 0.0, dx],
            [0.0, 1.0, 0.0, dy],
            [0.0, 0.0, 1.0, dz],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let inv = Matrix4::new([
            [1.0, 0.0, 0.0, -dx],
            [0.0, 1.0, 0.0, -dy],
            [0.0, 0.0, 1.0, -dz],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Self::from_parts(m, inv)
    }

    /// Per-axis scaling by `(sx, sy, sz)`.
    ///
    /// Precondition: all factors are non-zero. A zero factor makes the
    /// transform singular and its cached inverse unusable.
    pub fn scaling(sx: f64, sy: f64, sz: f64) -> Self {
        let m = Matrix4::new([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let inv = Matrix4::new([
            [1.0 / sx, 0.0, 0.0, 0.0],
            [0.0, 1.0 / sy, 0.0, 0.0],
            [0.0, 0.0, 1.0 / sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Self::from_parts(m, inv)
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        Self::from_parts(rotation_x_matrix(angle), rotation_x_matrix(-angle))
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        Self::from_parts(rotation_y_matrix(angle), rotation_y_matrix(-angle))
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        Self::from_parts(rotation_z_matrix(angle), rotation_z_matrix(-angle))
    }

    /// Shear where each coordinate moves in proportion to the other two.
    ///
    /// Fails if the parameters make the matrix singular.
    pub fn shearing(xy: f64, xz: f64, yx: f64, yz: f64, zx: f64, zy: f64) -> Result<Self> {
        Self::new(Matrix4::new([
            [1.0, xy, xz, 0.0],
            [yx, 1.0, yz, 0.0],
            [zx, zy, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]))
    }

    /// Compose: apply `self` first in object space, then `other`.
    ///
    /// Listing transforms left to right in construction order matches
    /// the order they take effect.
    pub fn then(&self, other: &Transform) -> Transform {
        Self::from_parts(other.matrix * self.matrix, self.inverse * other.inverse)
    }

    /// The transform running in the opposite direction.
    ///
    /// Cheap: the cached matrices swap roles, nothing is recomputed.
    pub fn inverted(&self) -> Transform {
        Self::from_parts(self.inverse, self.matrix)
    }

    /// The forward matrix.
    pub fn matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    /// The cached inverse matrix.
    pub fn inverse(&self) -> &Matrix4 {
        &self.inverse
    }

    /// The cached inverse-transpose, for normal conversion.
    pub fn inverse_transpose(&self) -> &Matrix4 {
        &self.inverse_transpose
    }

    /// Apply the forward matrix to a tuple.
    pub fn apply(&self, t: &Tuple) -> Tuple {
        self.matrix * *t
    }

    /// Apply the cached inverse to a tuple.
    pub fn apply_inverse(&self, t: &Tuple) -> Tuple {
        self.inverse * *t
    }

    /// Convert a surface normal through the inverse-transpose.
    ///
    /// The w component is forced back to 0 to strip translation
    /// contamination; callers re-normalize.
    pub fn apply_normal(&self, n: &Tuple) -> Tuple {
        let v = self.inverse_transpose * *n;
        Tuple::vector(v.x, v.y, v.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

fn rotation_x_matrix(angle: f64) -> Matrix4 {
    let (s, c) = angle.sin_cos();
    Matrix4::new([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, c, -s, 0.0],
        [0.0, s, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

fn rotation_y_matrix(angle: f64) -> Matrix4 {
    let (s, c) = angle.sin_cos();
    Matrix4::new([
        [c, 0.0, s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [-s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

fn rotation_z_matrix(angle: f64) -> Matrix4 {
    let (s, c) = angle.sin_cos();
    Matrix4::new([
        [c, -s, 0.0, 0.0],
        [s, c, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}
