//! Point light sources.

use lucent_math::{Colour, Tuple};

/// A dimensionless light source at a single position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// World-space position of the light.
    pub position: Tuple,
    /// Light colour and brightness.
    pub intensity: Colour,
}

impl PointLight {
    /// Create a point light.
    pub fn new(position: Tuple, intensity: Colour) -> Self {
        Self {
            position,
            intensity,
        }
    }
}
