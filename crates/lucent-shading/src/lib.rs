#![warn(missing_docs)]

//! Local-illumination shading for the lucent ray-tracing core.
//!
//! Point lights, procedural patterns evaluated in their own coordinate
//! space, and Phong materials. Geometry is elsewhere: these types only
//! ever see points that the shape layer has already converted for them.

pub mod light;
pub mod material;
pub mod pattern;

pub use light::PointLight;
pub use material::Material;
pub use pattern::{Pattern, PatternKind};
