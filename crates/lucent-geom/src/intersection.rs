//! Intersection records, hit selection and the CSG combination rule.

use crate::shape::{CsgOp, ShapeId};

/// A parametric distance paired with the shape it was computed against.
///
/// Purely observational: the handle points into the arena that produced
/// the intersection and carries no ownership.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Distance along the ray.
    pub t: f64,
    /// Handle of the intersected shape.
    pub shape: ShapeId,
}

impl Intersection {
    /// Create an intersection record.
    pub fn new(t: f64, shape: ShapeId) -> Self {
        Self { t, shape }
    }
}

/// Select the visible intersection: smallest non-negative t.
///
/// A single linear scan; the input need not be sorted. Returns `None`
/// when the list is empty or every t is negative — a normal result,
/// not an error.
pub fn hit(intersections: &[Intersection]) -> Option<&Intersection> {
    intersections
        .iter()
        .filter(|i| i.t >= 0.0)
        .min_by(|a, b| a.t.total_cmp(&b.t))
}

/// Decide whether a CSG candidate surface point lies on the boundary of
/// the combined solid.
///
/// `hit_is_left` says which operand produced the event; `in_left` and
/// `in_right` are the inside flags *before* the event is crossed.
/// Independent of the ray-casting path and testable as a pure truth
/// table.
pub fn csg_rule(op: CsgOp, hit_is_left: bool, in_left: bool, in_right: bool) -> bool {
    match op {
        CsgOp::Union => (hit_is_left && !in_right) || (!hit_is_left && !in_left),
        CsgOp::Intersection => (hit_is_left && in_right) || (!hit_is_left && in_left),
        CsgOp::Difference => (hit_is_left && !in_right) || (!hit_is_left && in_left),
    }
}
