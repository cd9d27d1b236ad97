//! Procedural colour patterns.
//!
//! A pattern is a colour function of a point in the pattern's own
//! coordinate space, plus a transform (with cached inverse) relating
//! that space to the owning shape's object space. The remaining
//! world-to-object conversion belongs to the shape layer.

use lucent_math::{Colour, Transform, Tuple};

/// The colour function variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatternKind {
    /// A single colour everywhere.
    Solid(Colour),
    /// Alternating bands along the x axis.
    Stripe(Colour, Colour),
    /// Linear blend of two colours over x in [0, 1].
    Gradient(Colour, Colour),
    /// Concentric rings in the x/z plane.
    Ring(Colour, Colour),
    /// Alternating unit cubes in all three dimensions.
    Checker(Colour, Colour),
}

/// A colour function with its own coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    transform: Transform,
    kind: PatternKind,
}

impl Pattern {
    /// Create a pattern with the identity transform.
    pub fn new(kind: PatternKind) -> Self {
        Self {
            transform: Transform::identity(),
            kind,
        }
    }

    /// A solid-colour pattern.
    pub fn solid(colour: Colour) -> Self {
        Self::new(PatternKind::Solid(colour))
    }

    /// A stripe pattern alternating `a` and `b` along x.
    pub fn stripe(a: Colour, b: Colour) -> Self {
        Self::new(PatternKind::Stripe(a, b))
    }

    /// A gradient from `a` at x=0 to `b` at x=1.
    pub fn gradient(a: Colour, b: Colour) -> Self {
        Self::new(PatternKind::Gradient(a, b))
    }

    /// A ring pattern alternating `a` and `b` radially in x/z.
    pub fn ring(a: Colour, b: Colour) -> Self {
        Self::new(PatternKind::Ring(a, b))
    }

    /// A 3D checker pattern alternating `a` and `b`.
    pub fn checker(a: Colour, b: Colour) -> Self {
        Self::new(PatternKind::Checker(a, b))
    }

    /// The pattern-space transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Replace the transform (and with it the cached inverse) whole.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Builder-style transform assignment.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// The colour at a point already expressed in pattern space.
    pub fn colour_at(&self, point: &Tuple) -> Colour {
        match self.kind {
            PatternKind::Solid(c) => c,
            PatternKind::Stripe(a, b) => {
                if point.x.floor() as i64 % 2 == 0 {
                    a
                } else {
                    b
                }
            }
            PatternKind::Gradient(a, b) => {
                let fraction = point.x - point.x.floor();
                a + (b - a) * fraction
            }
            PatternKind::Ring(a, b) => {
                let radius = (point.x * point.x + point.z * point.z).sqrt();
                if radius.floor() as i64 % 2 == 0 {
                    a
                } else {
                    b
                }
            }
            PatternKind::Checker(a, b) => {
                let sum = point.x.floor() + point.y.floor() + point.z.floor();
                if sum as i64 % 2 == 0 {
                    a
                } else {
                    b
                }
            }
        }
    }

    /// The colour at a point expressed in the owning shape's object
    /// space: applies the pattern's cached inverse, then the colour
    /// function.
    pub fn colour_at_object_point(&self, object_point: &Tuple) -> Colour {
        let pattern_point = self.transform.apply_inverse(object_point);
        self.colour_at(&pattern_point)
    }
}

/// Solid white, the material default.
impl Default for Pattern {
    fn default() -> Self {
        Self::solid(Colour::WHITE)
    }
}
