//! Phong materials and the local illumination equation.

use lucent_math::{Colour, Tuple};

use crate::light::PointLight;
use crate::pattern::Pattern;

/// Surface shading parameters.
///
/// `reflectivity`, `transparency` and `refractive_index` are carried as
/// data for the driver's secondary rays; this core only evaluates the
/// local ambient/diffuse/specular terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Colour function, evaluated in pattern space.
    pub pattern: Pattern,
    /// Ambient reflection coefficient.
    pub ambient: f64,
    /// Diffuse (Lambertian) reflection coefficient.
    pub diffuse: f64,
    /// Specular reflection coefficient.
    pub specular: f64,
    /// Specular exponent: higher is a tighter highlight.
    pub shininess: f64,
    /// Mirror reflectivity in [0, 1].
    pub reflectivity: f64,
    /// Transparency in [0, 1].
    pub transparency: f64,
    /// Refractive index of the material's interior.
    pub refractive_index: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            pattern: Pattern::default(),
            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.0,
            reflectivity: 0.0,
            transparency: 0.0,
            refractive_index: 1.0,
        }
    }
}

impl Material {
    /// Evaluate the Phong illumination equation at a surface point.
    ///
    /// `point` is the world-space surface point, `object_point` the same
    /// point in the shape's object space (for pattern lookup), `eyev`
    /// and `normalv` unit vectors toward the eye and along the surface
    /// normal. With `in_shadow` set, diffuse and specular are suppressed
    /// entirely and only the ambient term is returned.
    ///
    /// The result is not clamped to a displayable range.
    pub fn lighting(
        &self,
        light: &PointLight,
        point: &Tuple,
        object_point: &Tuple,
        eyev: &Tuple,
        normalv: &Tuple,
        in_shadow: bool,
    ) -> Colour {
        let effective = self.pattern.colour_at_object_point(object_point) * light.intensity;
        let ambient = effective * self.ambient;
        if in_shadow {
            return ambient;
        }

        let lightv = (light.position - *point).normalize();
        let light_dot_normal = lightv.dot(normalv);
        if light_dot_normal < 0.0 {
            // Light on the other side of the surface.
            return ambient;
        }

        let diffuse = effective * self.diffuse * light_dot_normal;

        let reflectv = (-lightv).reflect(normalv);
        let reflect_dot_eye = reflectv.dot(eyev);
        let specular = if reflect_dot_eye <= 0.0 {
            // Reflection points away from the eye.
            Colour::BLACK
        } else {
            light.intensity * self.specular * reflect_dot_eye.powf(self.shininess)
        };

        ambient + diffuse + specular
    }
}
