//! Ray representation.

use lucent_math::{Transform, Tuple};

/// A ray with an origin point and a direction vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Tuple,
    /// Direction of the ray.
    ///
    /// Not re-normalized by any operation here: preserving the caller's
    /// scale keeps t values meaningful across object-space conversions.
    pub direction: Tuple,
}

impl Ray {
    /// Create a ray from origin and direction.
    pub fn new(origin: Tuple, direction: Tuple) -> Self {
        Self { origin, direction }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn position(&self, t: f64) -> Tuple {
        self.origin + self.direction * t
    }

    /// Apply a transform to both origin and direction.
    pub fn transform(&self, transform: &Transform) -> Ray {
        Ray::new(
            transform.apply(&self.origin),
            transform.apply(&self.direction),
        )
    }
}
