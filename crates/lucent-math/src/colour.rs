//! RGB colour values with unconstrained arithmetic range.

use std::ops::{Add, Mul, Sub};

use crate::approx_eq;

/// An RGB colour.
///
/// Components are not clamped; intermediate shading math routinely
/// leaves [0, 1]. [`Colour::is_valid`] is a boundary check for the
/// canvas writer, never enforced internally.
#[derive(Debug, Clone, Copy, Default)]
pub struct Colour {
    /// Red component.
    pub r: f64,
    /// Green component.
    pub g: f64,
    /// Blue component.
    pub b: f64,
}

impl Colour {
    /// Create a colour from components.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Pure black.
    pub const BLACK: Colour = Colour::new(0.0, 0.0, 0.0);

    /// Pure white.
    pub const WHITE: Colour = Colour::new(1.0, 1.0, 1.0);

    /// True if every component lies in `[0, 1]`.
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.r)
            && (0.0..=1.0).contains(&self.g)
            && (0.0..=1.0).contains(&self.b)
    }
}

impl PartialEq for Colour {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.r, other.r) && approx_eq(self.g, other.g) && approx_eq(self.b, other.b)
    }
}

impl Add for Colour {
    type Output = Colour;

    fn add(self, rhs: Colour) -> Colour {
        Colour::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl Sub for Colour {
    type Output = Colour;

    fn sub(self, rhs: Colour) -> Colour {
        Colour::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl Mul<f64> for Colour {
    type Output = Colour;

    fn mul(self, factor: f64) -> Colour {
        Colour::new(self.r * factor, self.g * factor, self.b * factor)
    }
}

impl Mul<Colour> for f64 {
    type Output = Colour;

    fn mul(self, c: Colour) -> Colour {
        c * self
    }
}

/// Hadamard (componentwise) product.
impl Mul<Colour> for Colour {
    type Output = Colour;

    fn mul(self, rhs: Colour) -> Colour {
        Colour::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}
