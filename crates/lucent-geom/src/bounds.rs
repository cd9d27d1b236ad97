//! Axis-aligned bounding boxes and the ray-slab test.
//!
//! The primary acceleration device of the core: group and CSG nodes
//! test their bounds before descending into children.

use lucent_math::{Transform, Tuple, EPSILON};

use crate::ray::Ray;

/// An axis-aligned bounding volume described by two corner points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Tuple,
    /// Maximum corner.
    pub max: Tuple,
}

impl BoundingBox {
    /// Create a box from min and max corners.
    pub fn new(min: Tuple, max: Tuple) -> Self {
        Self { min, max }
    }

    /// The empty (inverted) box: min at +∞, max at −∞.
    ///
    /// Absorbing element for union; contains no point and is never
    /// intersected by any ray.
    pub fn empty() -> Self {
        Self {
            min: Tuple::point(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Tuple::point(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// True if the box covers no volume at all.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Extend the box to cover a point.
    pub fn add_point(&mut self, p: &Tuple) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Union with another box.
    ///
    /// The empty box is the union identity; its inverted corners must
    /// not be folded in as if they were real points.
    pub fn add_box(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.add_point(&other.min);
        self.add_point(&other.max);
    }

    /// Inclusive componentwise range test.
    pub fn contains_point(&self, p: &Tuple) -> bool {
        self.min.x <= p.x
            && p.x <= self.max.x
            && self.min.y <= p.y
            && p.y <= self.max.y
            && self.min.z <= p.z
            && p.z <= self.max.z
    }

    /// True if both corners of `other` lie inside this box.
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    /// Re-derive an axis-aligned box enclosing this box under `transform`.
    ///
    /// Equivalent to mapping all eight corners (an oriented transform is
    /// not axis-preserving, so the two original corners alone are not
    /// enough), accumulated per matrix coefficient instead: each output
    /// axis sums the smaller and larger of `coeff * min` / `coeff * max`
    /// onto the translation. Zero coefficients are skipped so that
    /// infinite extents (planes, untruncated cylinders and cones) pass
    /// through as ±∞ rather than poisoning the corner products with
    /// `0 × ∞ = NaN`.
    pub fn transform(&self, transform: &Transform) -> BoundingBox {
        if self.is_empty() {
            return BoundingBox::empty();
        }
        let m = transform.matrix();
        let mut min = [0.0; 3];
        let mut max = [0.0; 3];
        for axis in 0..3 {
            min[axis] = m[(axis, 3)];
            max[axis] = m[(axis, 3)];
            for (c, coeff) in (0..3).map(|c| (c, m[(axis, c)])) {
                if coeff == 0.0 {
                    continue;
                }
                let a = coeff * self.min[c];
                let b = coeff * self.max[c];
                min[axis] += a.min(b);
                max[axis] += a.max(b);
            }
        }
        BoundingBox::new(
            Tuple::point(min[0], min[1], min[2]),
            Tuple::point(max[0], max[1], max[2]),
        )
    }

    /// Ray-box overlap via the slab method.
    ///
    /// Each axis contributes an entry/exit interval against its two
    /// bounding planes; the box is hit iff the three intervals overlap
    /// and the overlap is not entirely behind the origin.
    pub fn intersects(&self, ray: &Ray) -> bool {
        if self.is_empty() {
            return false;
        }

        let (xt_min, xt_max) = check_axis(ray.origin.x, ray.direction.x, self.min.x, self.max.x);
        let (yt_min, yt_max) = check_axis(ray.origin.y, ray.direction.y, self.min.y, self.max.y);
        let (zt_min, zt_max) = check_axis(ray.origin.z, ray.direction.z, self.min.z, self.max.z);

        let t_min = xt_min.max(yt_min).max(zt_min);
        let t_max = xt_max.min(yt_max).min(zt_max);

        t_max >= t_min.max(0.0)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

/// Entry/exit parameters for one axis slab.
///
/// A ray parallel to the slab intersects it only if its origin already
/// lies within the slab's range; otherwise the whole box is missed,
/// reported as an inverted (empty) interval.
fn check_axis(origin: f64, direction: f64, min: f64, max: f64) -> (f64, f64) {
    if direction.abs() >= EPSILON {
        let t1 = (min - origin) / direction;
        let t2 = (max - origin) / direction;
        if t1 <= t2 {
            (t1, t2)
        } else {
            (t2, t1)
        }
    } else if min <= origin && origin <= max {
        (f64::NEG_INFINITY, f64::INFINITY)
    } else {
        (f64::INFINITY, f64::NEG_INFINITY)
    }
}
