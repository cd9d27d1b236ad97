#![warn(missing_docs)]

//! Geometry for the lucent ray-tracing core.
//!
//! Rays, axis-aligned bounding volumes, and a polymorphic shape
//! hierarchy (primitives, groups and CSG combinations) held in an
//! arena keyed by stable handles. Intersections record a parametric
//! distance and the handle of the shape they were computed against.
//!
//! All query operations are side-effect-free; a scene may be traced
//! from many threads at once as long as no setter runs concurrently.

pub mod bounds;
pub mod error;
pub mod intersection;
mod local;
pub mod ray;
pub mod shape;

pub use bounds::BoundingBox;
pub use error::{Result, ShapeError};
pub use intersection::{csg_rule, hit, Intersection};
pub use ray::Ray;
pub use shape::{CsgOp, Geometry, Shape, ShapeId, World};
