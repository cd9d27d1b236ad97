//! Homogeneous 4-component tuples: points (`w = 1`) and vectors (`w = 0`).

use std::ops::{Add, Div, Index, Mul, Neg, Sub};

use crate::approx_eq;
use crate::error::{MathError, Result};

/// A 4-component homogeneous coordinate.
///
/// `w = 1` marks a point, `w = 0` a vector. Point − Point = Vector,
/// Point + Vector = Point, Vector + Vector = Vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tuple {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
    /// Homogeneous component: 1 for points, 0 for vectors.
    pub w: f64,
}

impl Tuple {
    /// Create a tuple with an explicit `w` component.
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Create a point (`w = 1`).
    pub const fn point(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 1.0)
    }

    /// Create a vector (`w = 0`).
    pub const fn vector(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 0.0)
    }

    /// The zero vector.
    pub const ZERO_VECTOR: Tuple = Tuple::vector(0.0, 0.0, 0.0);

    /// True if this tuple carries the point flag.
    pub fn is_point(&self) -> bool {
        approx_eq(self.w, 1.0)
    }

    /// True if this tuple carries the vector flag.
    pub fn is_vector(&self) -> bool {
        approx_eq(self.w, 0.0)
    }

    /// Checked component access over `x, y, z, w`.
    pub fn get(&self, index: usize) -> Result<f64> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            2 => Ok(self.z),
            3 => Ok(self.w),
            _ => Err(MathError::IndexOutOfRange { index, len: 4 }),
        }
    }

    /// Dot product over all four components.
    pub fn dot(&self, other: &Tuple) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Cross product, defined only between vectors.
    ///
    /// Fails if either operand carries the point flag.
    pub fn cross(&self, other: &Tuple) -> Result<Tuple> {
        if self.is_point() || other.is_point() {
            return Err(MathError::CrossRequiresVectors);
        }
        Ok(Tuple::vector(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        ))
    }

    /// Euclidean magnitude.
    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Scale to unit magnitude.
    ///
    /// Precondition: the tuple must have non-zero magnitude. Normalizing
    /// a zero-length vector is undefined and not guarded here.
    pub fn normalize(&self) -> Tuple {
        *self / self.magnitude()
    }

    /// Reflect this vector about a unit normal.
    pub fn reflect(&self, normal: &Tuple) -> Tuple {
        *self - *normal * (2.0 * self.dot(normal))
    }
}

impl PartialEq for Tuple {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x)
            && approx_eq(self.y, other.y)
            && approx_eq(self.z, other.z)
            && approx_eq(self.w, other.w)
    }
}

impl Index<usize> for Tuple {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("tuple index {index} out of range"),
        }
    }
}

impl Add for Tuple {
    type Output = Tuple;

    fn add(self, rhs: Tuple) -> Tuple {
        Tuple::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}

impl Sub for Tuple {
    type Output = Tuple;

    fn sub(self, rhs: Tuple) -> Tuple {
        Tuple::new(
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
            self.w - rhs.w,
        )
    }
}

impl Neg for Tuple {
    type Output = Tuple;

    fn neg(self) -> Tuple {
        Tuple::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl Mul<f64> for Tuple {
    type Output = Tuple;

    fn mul(self, factor: f64) -> Tuple {
        Tuple::new(
            self.x * factor,
            self.y * factor,
            self.z * factor,
            self.w * factor,
        )
    }
}

impl Mul<Tuple> for f64 {
    type Output = Tuple;

    fn mul(self, t: Tuple) -> Tuple {
        t * self
    }
}

impl Div<f64> for Tuple {
    type Output = Tuple;

    fn div(self, denom: f64) -> Tuple {
        Tuple::new(
            self.x / denom,
            self.y / denom,
            self.z / denom,
            self.w / denom,
        )
    }
}
