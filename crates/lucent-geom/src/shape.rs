//! The shape arena: primitives, groups and CSG nodes.
//!
//! Shapes live in a [`World`] keyed by stable [`ShapeId`] handles, and
//! parent/child links are expressed through those handles rather than
//! owned pointers. Every query goes through the arena, which lets
//! groups and CSG nodes reference children without reference counting
//! and makes cycles detectable at mutation time.

use std::sync::Arc;

use lucent_math::{Colour, Transform, Tuple};
use lucent_shading::{Material, PointLight};
use slotmap::SlotMap;

use crate::bounds::BoundingBox;
use crate::error::{Result, ShapeError};
use crate::intersection::{csg_rule, Intersection};
use crate::local;
use crate::ray::Ray;

slotmap::new_key_type! {
    /// Stable handle to a shape in a [`World`].
    pub struct ShapeId;
}

/// Set operation of a CSG node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsgOp {
    /// Points inside either operand.
    Union,
    /// Points inside both operands.
    Intersection,
    /// Points inside the left operand but not the right.
    Difference,
}

/// The geometric identity of a shape, in its own object space.
///
/// Primitives are canonical: unit sphere and cube at the origin, the
/// x/z plane, y-axis cylinders and cones of unit radius at |y| = 1.
/// Position, orientation and size come from the shape's transform.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Unit sphere centred on the origin.
    Sphere,
    /// The infinite x/z plane at y = 0.
    Plane,
    /// Axis-aligned cube from (-1,-1,-1) to (1,1,1).
    Cube,
    /// A y-axis cylinder of radius 1, optionally truncated and capped.
    Cylinder {
        /// Lower y bound, exclusive for the wall.
        minimum: f64,
        /// Upper y bound, exclusive for the wall.
        maximum: f64,
        /// Whether the truncation planes are solid end caps.
        closed: bool,
    },
    /// A y-axis double cone with apex at the origin, optionally
    /// truncated and capped.
    Cone {
        /// Lower y bound, exclusive for the wall.
        minimum: f64,
        /// Upper y bound, exclusive for the wall.
        maximum: f64,
        /// Whether the truncation planes are solid end caps.
        closed: bool,
    },
    /// An aggregate of child shapes with no surface of its own.
    Group {
        /// Handles of the children, in insertion order.
        children: Vec<ShapeId>,
    },
    /// A set combination of exactly two operands.
    Csg {
        /// The set operation.
        op: CsgOp,
        /// Left operand.
        left: ShapeId,
        /// Right operand.
        right: ShapeId,
    },
}

impl Geometry {
    /// An infinite, uncapped cylinder.
    pub fn cylinder() -> Self {
        Geometry::Cylinder {
            minimum: f64::NEG_INFINITY,
            maximum: f64::INFINITY,
            closed: false,
        }
    }

    /// An infinite, uncapped double cone.
    pub fn cone() -> Self {
        Geometry::Cone {
            minimum: f64::NEG_INFINITY,
            maximum: f64::INFINITY,
            closed: false,
        }
    }

    /// An empty group.
    pub fn group() -> Self {
        Geometry::Group {
            children: Vec::new(),
        }
    }
}

/// A placed shape: geometry plus transform, material and hierarchy data.
#[derive(Debug, Clone)]
pub struct Shape {
    transform: Transform,
    material: Arc<Material>,
    parent: Option<ShapeId>,
    casts_shadow: bool,
    geometry: Geometry,
    // Object-space bounds, kept fresh by every mutator so intersection
    // never recomputes a subtree union per ray.
    bounds: BoundingBox,
}

impl Shape {
    /// The transform from this shape's object space into its parent's
    /// space (or world space for a root shape).
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// The shape's material.
    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    /// Handle of the enclosing group or CSG node, if any.
    pub fn parent(&self) -> Option<ShapeId> {
        self.parent
    }

    /// Whether this shape blocks light when shadow rays are cast.
    pub fn casts_shadow(&self) -> bool {
        self.casts_shadow
    }

    /// The shape's geometry.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }
}

/// Arena of shapes making up a scene.
#[derive(Debug, Clone, Default)]
pub struct World {
    shapes: SlotMap<ShapeId, Shape>,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape with identity transform and default material.
    pub fn add_shape(&mut self, geometry: Geometry) -> ShapeId {
        let id = self.shapes.insert(Shape {
            transform: Transform::identity(),
            material: Arc::new(Material::default()),
            parent: None,
            casts_shadow: true,
            geometry,
            bounds: BoundingBox::empty(),
        });
        let bounds = self.compute_bounds(id);
        self.shapes[id].bounds = bounds;
        id
    }

    /// Add an empty group.
    pub fn add_group(&mut self) -> ShapeId {
        self.add_shape(Geometry::group())
    }

    /// Look up a shape by handle.
    pub fn shape(&self, id: ShapeId) -> Result<&Shape> {
        self.shapes.get(id).ok_or(ShapeError::UnknownShape)
    }

    /// Replace a shape's transform.
    pub fn set_transform(&mut self, id: ShapeId, transform: Transform) -> Result<()> {
        let shape = self.shapes.get_mut(id).ok_or(ShapeError::UnknownShape)?;
        shape.transform = transform;
        let parent = shape.parent;
        self.refresh_bounds(parent);
        Ok(())
    }

    /// Replace a shape's material. The `Arc` lets many shapes share one
    /// material without copying it per shape.
    pub fn set_material(&mut self, id: ShapeId, material: Arc<Material>) -> Result<()> {
        let shape = self.shapes.get_mut(id).ok_or(ShapeError::UnknownShape)?;
        shape.material = material;
        Ok(())
    }

    /// Set whether a shape participates in shadow casting.
    pub fn set_casts_shadow(&mut self, id: ShapeId, casts_shadow: bool) -> Result<()> {
        let shape = self.shapes.get_mut(id).ok_or(ShapeError::UnknownShape)?;
        shape.casts_shadow = casts_shadow;
        Ok(())
    }

    /// Attach `child` to `group`, reparenting it away from any previous
    /// group. Fails if `group` is not a group, if the link would make a
    /// shape its own ancestor, or if `child` is a CSG operand (a CSG
    /// node cannot give one up).
    pub fn add_child(&mut self, group: ShapeId, child: ShapeId) -> Result<()> {
        self.shape(child)?;
        match &self.shape(group)?.geometry {
            Geometry::Group { .. } => {}
            _ => return Err(ShapeError::NotAGroup),
        }
        if self.includes(child, group) {
            return Err(ShapeError::CycleDetected);
        }

        let old_parent = self.shapes[child].parent;
        if let Some(old) = old_parent {
            match &mut self.shapes[old].geometry {
                Geometry::Group { children } => children.retain(|&c| c != child),
                Geometry::Csg { .. } => return Err(ShapeError::OperandInUse),
                _ => {}
            }
        }
        if let Geometry::Group { children } = &mut self.shapes[group].geometry {
            children.push(child);
        }
        self.shapes[child].parent = Some(group);
        self.refresh_bounds(old_parent);
        self.refresh_bounds(Some(group));
        Ok(())
    }

    /// Add a CSG node combining two existing shapes.
    ///
    /// The operands become children of the new node, detached from any
    /// previous group. Rejected: operands whose subtrees overlap (one
    /// contains the other, including the degenerate `left == right`
    /// case) and operands already serving another CSG node.
    pub fn add_csg(&mut self, op: CsgOp, left: ShapeId, right: ShapeId) -> Result<ShapeId> {
        self.shape(left)?;
        self.shape(right)?;
        if self.includes(left, right) || self.includes(right, left) {
            return Err(ShapeError::CycleDetected);
        }
        for operand in [left, right] {
            if let Some(old) = self.shapes[operand].parent {
                if matches!(self.shapes[old].geometry, Geometry::Csg { .. }) {
                    return Err(ShapeError::OperandInUse);
                }
            }
        }

        for operand in [left, right] {
            if let Some(old) = self.shapes[operand].parent {
                if let Geometry::Group { children } = &mut self.shapes[old].geometry {
                    children.retain(|&c| c != operand);
                }
                self.refresh_bounds(Some(old));
            }
        }
        let id = self.add_shape(Geometry::Csg { op, left, right });
        self.shapes[left].parent = Some(id);
        self.shapes[right].parent = Some(id);
        Ok(id)
    }

    /// True if `id` equals `ancestor` or sits anywhere beneath it.
    pub fn includes(&self, ancestor: ShapeId, id: ShapeId) -> bool {
        if ancestor == id {
            return true;
        }
        match self.shapes.get(ancestor).map(|s| &s.geometry) {
            Some(Geometry::Group { children }) => {
                children.iter().any(|&c| self.includes(c, id))
            }
            Some(Geometry::Csg { left, right, .. }) => {
                self.includes(*left, id) || self.includes(*right, id)
            }
            _ => false,
        }
    }

    /// Intersect a ray (in the shape's parent space) with a shape.
    ///
    /// Groups merge their children's intersections into one ascending
    /// list; CSG nodes additionally filter the merged list down to the
    /// surface of the combined solid. Group and CSG nodes test their
    /// bounding box first and skip the descent entirely on a miss.
    pub fn intersect(&self, id: ShapeId, ray: &Ray) -> Result<Vec<Intersection>> {
        let shape = self.shape(id)?;
        let local_ray = ray.transform(&shape.transform.inverted());
        match &shape.geometry {
            Geometry::Sphere => Ok(to_intersections(local::sphere_intersect(&local_ray), id)),
            Geometry::Plane => Ok(to_intersections(local::plane_intersect(&local_ray), id)),
            Geometry::Cube => Ok(to_intersections(local::cube_intersect(&local_ray), id)),
            Geometry::Cylinder {
                minimum,
                maximum,
                closed,
            } => Ok(to_intersections(
                local::cylinder_intersect(*minimum, *maximum, *closed, &local_ray),
                id,
            )),
            Geometry::Cone {
                minimum,
                maximum,
                closed,
            } => Ok(to_intersections(
                local::cone_intersect(*minimum, *maximum, *closed, &local_ray),
                id,
            )),
            Geometry::Group { children } => {
                if !shape.bounds.intersects(&local_ray) {
                    return Ok(Vec::new());
                }
                let mut xs = Vec::new();
                for &child in children {
                    xs.extend(self.intersect(child, &local_ray)?);
                }
                xs.sort_by(|a, b| a.t.total_cmp(&b.t));
                Ok(xs)
            }
            Geometry::Csg { op, left, right } => {
                if !shape.bounds.intersects(&local_ray) {
                    return Ok(Vec::new());
                }
                let mut xs = self.intersect(*left, &local_ray)?;
                xs.extend(self.intersect(*right, &local_ray)?);
                xs.sort_by(|a, b| a.t.total_cmp(&b.t));
                Ok(self.filter_csg(*op, *left, &xs))
            }
        }
    }

    /// Walk an ascending intersection list and keep the events that lie
    /// on the boundary of the combined solid.
    ///
    /// The inside flags describe the state *before* each event; the
    /// event always toggles the flag for its side afterwards, whether
    /// or not it was kept.
    fn filter_csg(&self, op: CsgOp, left: ShapeId, xs: &[Intersection]) -> Vec<Intersection> {
        let mut in_left = false;
        let mut in_right = false;
        let mut kept = Vec::new();
        for i in xs {
            let hit_is_left = self.includes(left, i.shape);
            if csg_rule(op, hit_is_left, in_left, in_right) {
                kept.push(*i);
            }
            if hit_is_left {
                in_left = !in_left;
            } else {
                in_right = !in_right;
            }
        }
        kept
    }

    /// Surface normal of a shape at a world-space point, in world space.
    ///
    /// Groups and CSG nodes have no surface of their own and return
    /// [`ShapeError::CompositeHasNoNormal`].
    pub fn normal_at(&self, id: ShapeId, world_point: &Tuple) -> Result<Tuple> {
        let shape = self.shape(id)?;
        let object_point = self.world_to_object(id, world_point)?;
        let local_normal = match &shape.geometry {
            Geometry::Sphere => local::sphere_normal(&object_point),
            Geometry::Plane => local::plane_normal(),
            Geometry::Cube => local::cube_normal(&object_point),
            Geometry::Cylinder {
                minimum,
                maximum,
                closed,
            } => local::cylinder_normal(*minimum, *maximum, *closed, &object_point),
            Geometry::Cone {
                minimum,
                maximum,
                closed,
            } => local::cone_normal(*minimum, *maximum, *closed, &object_point),
            Geometry::Group { .. } | Geometry::Csg { .. } => {
                return Err(ShapeError::CompositeHasNoNormal)
            }
        };
        self.normal_to_world(id, &local_normal)
    }

    /// Convert a world-space point into a shape's object space,
    /// applying every ancestor transform from the root down.
    pub fn world_to_object(&self, id: ShapeId, point: &Tuple) -> Result<Tuple> {
        let shape = self.shape(id)?;
        let point = match shape.parent {
            Some(parent) => self.world_to_object(parent, point)?,
            None => *point,
        };
        Ok(shape.transform.apply_inverse(&point))
    }

    /// Convert an object-space normal into world space, renormalizing
    /// at each level on the way up.
    pub fn normal_to_world(&self, id: ShapeId, normal: &Tuple) -> Result<Tuple> {
        let shape = self.shape(id)?;
        let n = shape.transform.apply_normal(normal).normalize();
        match shape.parent {
            Some(parent) => self.normal_to_world(parent, &n),
            None => Ok(n),
        }
    }

    /// The shape's bounding box in its own object space.
    ///
    /// Planes and untruncated cylinders and cones are unbounded along
    /// some axes and report infinite extents there; group and CSG
    /// bounds are the union of their children's parent-space boxes.
    /// Cached: mutators keep every box current, so reads are O(1).
    pub fn bounds(&self, id: ShapeId) -> Result<BoundingBox> {
        Ok(self.shape(id)?.bounds)
    }

    /// Recompute the object-space bounds of one shape from its geometry
    /// and (for composites) its children's cached boxes.
    fn compute_bounds(&self, id: ShapeId) -> BoundingBox {
        match &self.shapes[id].geometry {
            Geometry::Sphere | Geometry::Cube => BoundingBox::new(
                Tuple::point(-1.0, -1.0, -1.0),
                Tuple::point(1.0, 1.0, 1.0),
            ),
            Geometry::Plane => BoundingBox::new(
                Tuple::point(f64::NEG_INFINITY, 0.0, f64::NEG_INFINITY),
                Tuple::point(f64::INFINITY, 0.0, f64::INFINITY),
            ),
            Geometry::Cylinder {
                minimum, maximum, ..
            } => BoundingBox::new(
                Tuple::point(-1.0, *minimum, -1.0),
                Tuple::point(1.0, *maximum, 1.0),
            ),
            Geometry::Cone {
                minimum, maximum, ..
            } => {
                let r = minimum.abs().max(maximum.abs());
                BoundingBox::new(
                    Tuple::point(-r, *minimum, -r),
                    Tuple::point(r, *maximum, r),
                )
            }
            Geometry::Group { children } => {
                let mut out = BoundingBox::empty();
                for &child in children {
                    let shape = &self.shapes[child];
                    out.add_box(&shape.bounds.transform(&shape.transform));
                }
                out
            }
            Geometry::Csg { left, right, .. } => {
                let mut out = BoundingBox::empty();
                for operand in [*left, *right] {
                    let shape = &self.shapes[operand];
                    out.add_box(&shape.bounds.transform(&shape.transform));
                }
                out
            }
        }
    }

    /// Recompute cached bounds from `from` up through every ancestor.
    ///
    /// A child's box only ever affects the chain above it, so one walk
    /// restores the cache invariant after any structural change.
    fn refresh_bounds(&mut self, from: Option<ShapeId>) {
        let mut cur = from;
        while let Some(id) = cur {
            let bounds = self.compute_bounds(id);
            let shape = &mut self.shapes[id];
            shape.bounds = bounds;
            cur = shape.parent;
        }
    }

    /// The shape's bounding box expressed in its parent's space.
    pub fn parent_space_bounds(&self, id: ShapeId) -> Result<BoundingBox> {
        let shape = self.shape(id)?;
        Ok(self.bounds(id)?.transform(&shape.transform))
    }

    /// The pattern colour of a shape at a world-space point.
    pub fn colour_at_object(&self, id: ShapeId, world_point: &Tuple) -> Result<Colour> {
        let shape = self.shape(id)?;
        let object_point = self.world_to_object(id, world_point)?;
        Ok(shape
            .material
            .pattern
            .colour_at_object_point(&object_point))
    }

    /// Shade a surface point of a shape under a point light.
    ///
    /// Glue over [`Material::lighting`]: the world maps the point into
    /// object space so patterns anchor to the shape they are on.
    pub fn lighting(
        &self,
        id: ShapeId,
        light: &PointLight,
        world_point: &Tuple,
        eyev: &Tuple,
        normalv: &Tuple,
        in_shadow: bool,
    ) -> Result<Colour> {
        let shape = self.shape(id)?;
        let object_point = self.world_to_object(id, world_point)?;
        Ok(shape
            .material
            .lighting(light, world_point, &object_point, eyev, normalv, in_shadow))
    }
}

fn to_intersections(ts: Vec<f64>, id: ShapeId) -> Vec<Intersection> {
    ts.into_iter().map(|t| Intersection::new(t, id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucent_shading::Pattern;
    use std::f64::consts::PI;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_default_shape_state() {
        let mut world = World::new();
        let s = world.add_shape(Geometry::Sphere);
        let shape = world.shape(s).unwrap();
        assert_eq!(*shape.transform(), Transform::identity());
        assert_eq!(**shape.material(), Material::default());
        assert_eq!(shape.parent(), None);
        assert!(shape.casts_shadow());
    }

    #[test]
    fn test_unknown_handle_rejected() {
        let mut scratch = World::new();
        let foreign = scratch.add_shape(Geometry::Sphere);
        let world = World::new();
        assert_eq!(world.shape(foreign).err(), Some(ShapeError::UnknownShape));
        let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));
        assert_eq!(world.intersect(foreign, &r), Err(ShapeError::UnknownShape));
    }

    #[test]
    fn test_intersect_scaled_sphere() {
        let mut world = World::new();
        let s = world.add_shape(Geometry::Sphere);
        world
            .set_transform(s, Transform::scaling(2.0, 2.0, 2.0))
            .unwrap();
        let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));
        let xs = world.intersect(s, &r).unwrap();
        assert_eq!(xs.len(), 2);
        assert_eq!(xs[0].t, 3.0);
        assert_eq!(xs[1].t, 7.0);
        assert_eq!(xs[0].shape, s);
    }

    #[test]
    fn test_intersect_translated_sphere_misses() {
        let mut world = World::new();
        let s = world.add_shape(Geometry::Sphere);
        world
            .set_transform(s, Transform::translation(5.0, 0.0, 0.0))
            .unwrap();
        let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));
        assert!(world.intersect(s, &r).unwrap().is_empty());
    }

    #[test]
    fn test_sphere_normal_on_axis_and_off() {
        let mut world = World::new();
        let s = world.add_shape(Geometry::Sphere);
        assert_eq!(
            world.normal_at(s, &Tuple::point(1.0, 0.0, 0.0)).unwrap(),
            Tuple::vector(1.0, 0.0, 0.0)
        );
        let k = 3.0_f64.sqrt() / 3.0;
        let n = world.normal_at(s, &Tuple::point(k, k, k)).unwrap();
        assert_eq!(n, Tuple::vector(k, k, k));
        assert_eq!(n, n.normalize());
    }

    #[test]
    fn test_normal_on_translated_sphere() {
        let mut world = World::new();
        let s = world.add_shape(Geometry::Sphere);
        world
            .set_transform(s, Transform::translation(0.0, 1.0, 0.0))
            .unwrap();
        let n = world
            .normal_at(s, &Tuple::point(0.0, 1.70711, -0.70711))
            .unwrap();
        assert!(close(n.x, 0.0, 1e-5));
        assert!(close(n.y, 0.70711, 1e-5));
        assert!(close(n.z, -0.70711, 1e-5));
    }

    #[test]
    fn test_normal_on_transformed_sphere() {
        let mut world = World::new();
        let s = world.add_shape(Geometry::Sphere);
        world
            .set_transform(
                s,
                Transform::rotation_z(PI / 5.0).then(&Transform::scaling(1.0, 0.5, 1.0)),
            )
            .unwrap();
        let h = 2.0_f64.sqrt() / 2.0;
        let n = world.normal_at(s, &Tuple::point(0.0, h, -h)).unwrap();
        assert!(close(n.x, 0.0, 1e-5));
        assert!(close(n.y, 0.97014, 1e-5));
        assert!(close(n.z, -0.24254, 1e-5));
    }

    #[test]
    fn test_empty_group_has_no_intersections() {
        let mut world = World::new();
        let g = world.add_group();
        let r = Ray::new(Tuple::point(0.0, 0.0, 0.0), Tuple::vector(0.0, 0.0, 1.0));
        assert!(world.intersect(g, &r).unwrap().is_empty());
    }

    #[test]
    fn test_group_merges_children_in_ascending_order() {
        let mut world = World::new();
        let g = world.add_group();
        let s1 = world.add_shape(Geometry::Sphere);
        let s2 = world.add_shape(Geometry::Sphere);
        world
            .set_transform(s2, Transform::translation(0.0, 0.0, -3.0))
            .unwrap();
        let s3 = world.add_shape(Geometry::Sphere);
        world
            .set_transform(s3, Transform::translation(5.0, 0.0, 0.0))
            .unwrap();
        world.add_child(g, s1).unwrap();
        world.add_child(g, s2).unwrap();
        world.add_child(g, s3).unwrap();

        let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));
        let xs = world.intersect(g, &r).unwrap();
        assert_eq!(xs.len(), 4);
        assert_eq!(xs[0].shape, s2);
        assert_eq!(xs[1].shape, s2);
        assert_eq!(xs[2].shape, s1);
        assert_eq!(xs[3].shape, s1);
    }

    #[test]
    fn test_intersecting_transformed_group() {
        let mut world = World::new();
        let g = world.add_group();
        world
            .set_transform(g, Transform::scaling(2.0, 2.0, 2.0))
            .unwrap();
        let s = world.add_shape(Geometry::Sphere);
        world
            .set_transform(s, Transform::translation(5.0, 0.0, 0.0))
            .unwrap();
        world.add_child(g, s).unwrap();

        let r = Ray::new(Tuple::point(10.0, 0.0, -10.0), Tuple::vector(0.0, 0.0, 1.0));
        let xs = world.intersect(g, &r).unwrap();
        assert_eq!(xs.len(), 2);
    }

    #[test]
    fn test_group_has_no_normal() {
        let mut world = World::new();
        let g = world.add_group();
        assert_eq!(
            world.normal_at(g, &Tuple::point(0.0, 0.0, 0.0)),
            Err(ShapeError::CompositeHasNoNormal)
        );
    }

    #[test]
    fn test_add_child_requires_group() {
        let mut world = World::new();
        let s = world.add_shape(Geometry::Sphere);
        let c = world.add_shape(Geometry::Cube);
        assert_eq!(world.add_child(s, c), Err(ShapeError::NotAGroup));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut world = World::new();
        let g1 = world.add_group();
        let g2 = world.add_group();
        world.add_child(g1, g2).unwrap();
        assert_eq!(world.add_child(g2, g1), Err(ShapeError::CycleDetected));
        assert_eq!(world.add_child(g1, g1), Err(ShapeError::CycleDetected));
    }

    #[test]
    fn test_reparenting_removes_old_link() {
        let mut world = World::new();
        let g1 = world.add_group();
        let g2 = world.add_group();
        let s = world.add_shape(Geometry::Sphere);
        world.add_child(g1, s).unwrap();
        world.add_child(g2, s).unwrap();
        assert_eq!(world.shape(s).unwrap().parent(), Some(g2));
        match world.shape(g1).unwrap().geometry() {
            Geometry::Group { children } => assert!(children.is_empty()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_world_to_object_through_nested_groups() {
        let mut world = World::new();
        let g1 = world.add_group();
        world.set_transform(g1, Transform::rotation_y(PI / 2.0)).unwrap();
        let g2 = world.add_group();
        world
            .set_transform(g2, Transform::scaling(2.0, 2.0, 2.0))
            .unwrap();
        world.add_child(g1, g2).unwrap();
        let s = world.add_shape(Geometry::Sphere);
        world
            .set_transform(s, Transform::translation(5.0, 0.0, 0.0))
            .unwrap();
        world.add_child(g2, s).unwrap();

        let p = world
            .world_to_object(s, &Tuple::point(-2.0, 0.0, -10.0))
            .unwrap();
        assert!(close(p.x, 0.0, 1e-5));
        assert!(close(p.y, 0.0, 1e-5));
        assert!(close(p.z, -1.0, 1e-5));
    }

    #[test]
    fn test_normal_to_world_through_nested_groups() {
        let mut world = World::new();
        let g1 = world.add_group();
        world.set_transform(g1, Transform::rotation_y(PI / 2.0)).unwrap();
        let g2 = world.add_group();
        world
            .set_transform(g2, Transform::scaling(1.0, 2.0, 3.0))
            .unwrap();
        world.add_child(g1, g2).unwrap();
        let s = world.add_shape(Geometry::Sphere);
        world
            .set_transform(s, Transform::translation(5.0, 0.0, 0.0))
            .unwrap();
        world.add_child(g2, s).unwrap();

        let k = 3.0_f64.sqrt() / 3.0;
        let n = world.normal_to_world(s, &Tuple::vector(k, k, k)).unwrap();
        assert!(close(n.x, 0.2857, 1e-4));
        assert!(close(n.y, 0.4286, 1e-4));
        assert!(close(n.z, -0.8571, 1e-4));
    }

    #[test]
    fn test_normal_on_child_of_nested_groups() {
        let mut world = World::new();
        let g1 = world.add_group();
        world.set_transform(g1, Transform::rotation_y(PI / 2.0)).unwrap();
        let g2 = world.add_group();
        world
            .set_transform(g2, Transform::scaling(1.0, 2.0, 3.0))
            .unwrap();
        world.add_child(g1, g2).unwrap();
        let s = world.add_shape(Geometry::Sphere);
        world
            .set_transform(s, Transform::translation(5.0, 0.0, 0.0))
            .unwrap();
        world.add_child(g2, s).unwrap();

        let n = world
            .normal_at(s, &Tuple::point(1.7321, 1.1547, -5.5774))
            .unwrap();
        assert!(close(n.x, 0.2857, 1e-4));
        assert!(close(n.y, 0.42854, 1e-4));
        assert!(close(n.z, -0.85716, 1e-4));
    }

    #[test]
    fn test_group_bounds_contain_children() {
        let mut world = World::new();
        let g = world.add_group();
        let s = world.add_shape(Geometry::Sphere);
        world
            .set_transform(
                s,
                Transform::scaling(2.0, 2.0, 2.0).then(&Transform::translation(2.0, 5.0, -3.0)),
            )
            .unwrap();
        let c = world.add_shape(Geometry::Cylinder {
            minimum: -2.0,
            maximum: 2.0,
            closed: false,
        });
        world
            .set_transform(
                c,
                Transform::scaling(0.5, 1.0, 0.5).then(&Transform::translation(-4.0, -1.0, 4.0)),
            )
            .unwrap();
        world.add_child(g, s).unwrap();
        world.add_child(g, c).unwrap();

        let b = world.bounds(g).unwrap();
        assert_eq!(b.min, Tuple::point(-4.5, -3.0, -5.0));
        assert_eq!(b.max, Tuple::point(4.0, 7.0, 4.5));
    }

    #[test]
    fn test_parent_space_bounds() {
        let mut world = World::new();
        let s = world.add_shape(Geometry::Sphere);
        world
            .set_transform(
                s,
                Transform::scaling(0.5, 2.0, 4.0).then(&Transform::translation(1.0, -3.0, 5.0)),
            )
            .unwrap();
        let b = world.parent_space_bounds(s).unwrap();
        assert_eq!(b.min, Tuple::point(0.5, -5.0, 1.0));
        assert_eq!(b.max, Tuple::point(1.5, -1.0, 9.0));
    }

    #[test]
    fn test_primitive_bounds() {
        let mut world = World::new();
        let p = world.add_shape(Geometry::Plane);
        let b = world.bounds(p).unwrap();
        assert_eq!(b.min.y, 0.0);
        assert_eq!(b.max.y, 0.0);
        assert_eq!(b.min.x, f64::NEG_INFINITY);
        assert_eq!(b.max.z, f64::INFINITY);

        let c = world.add_shape(Geometry::Cone {
            minimum: -1.5,
            maximum: 0.5,
            closed: true,
        });
        let b = world.bounds(c).unwrap();
        assert_eq!(b.min, Tuple::point(-1.5, -1.5, -1.5));
        assert_eq!(b.max, Tuple::point(1.5, 0.5, 1.5));
    }

    #[test]
    fn test_plane_inside_group_is_intersected() {
        let mut world = World::new();
        let g = world.add_group();
        let p = world.add_shape(Geometry::Plane);
        world.add_child(g, p).unwrap();

        let b = world.parent_space_bounds(p).unwrap();
        assert!(!b.is_empty());
        assert_eq!(b.min.x, f64::NEG_INFINITY);
        assert_eq!(b.max.z, f64::INFINITY);

        let r = Ray::new(Tuple::point(0.0, 1.0, 0.0), Tuple::vector(0.0, -1.0, 0.0));
        let xs = world.intersect(g, &r).unwrap();
        assert_eq!(xs.len(), 1);
        assert_eq!(xs[0].t, 1.0);
        assert_eq!(xs[0].shape, p);
    }

    #[test]
    fn test_group_bounds_follow_child_transform() {
        let mut world = World::new();
        let outer = world.add_group();
        let g = world.add_group();
        world.add_child(outer, g).unwrap();
        let s = world.add_shape(Geometry::Sphere);
        world.add_child(g, s).unwrap();

        let b = world.bounds(g).unwrap();
        assert_eq!(b.min, Tuple::point(-1.0, -1.0, -1.0));
        assert_eq!(b.max, Tuple::point(1.0, 1.0, 1.0));

        world
            .set_transform(s, Transform::translation(5.0, 0.0, 0.0))
            .unwrap();
        let b = world.bounds(g).unwrap();
        assert_eq!(b.min, Tuple::point(4.0, -1.0, -1.0));
        assert_eq!(b.max, Tuple::point(6.0, 1.0, 1.0));

        // The change propagates past the immediate parent.
        let b = world.bounds(outer).unwrap();
        assert_eq!(b.min, Tuple::point(4.0, -1.0, -1.0));
        assert_eq!(b.max, Tuple::point(6.0, 1.0, 1.0));
    }

    #[test]
    fn test_csg_construction_wires_parents() {
        let mut world = World::new();
        let s = world.add_shape(Geometry::Sphere);
        let c = world.add_shape(Geometry::Cube);
        let node = world.add_csg(CsgOp::Union, s, c).unwrap();
        match world.shape(node).unwrap().geometry() {
            Geometry::Csg { op, left, right } => {
                assert_eq!(*op, CsgOp::Union);
                assert_eq!(*left, s);
                assert_eq!(*right, c);
            }
            _ => unreachable!(),
        }
        assert_eq!(world.shape(s).unwrap().parent(), Some(node));
        assert_eq!(world.shape(c).unwrap().parent(), Some(node));
        assert_eq!(world.add_csg(CsgOp::Union, s, s), Err(ShapeError::CycleDetected));
    }

    #[test]
    fn test_csg_rejects_overlapping_operands() {
        let mut world = World::new();
        let g = world.add_group();
        let s = world.add_shape(Geometry::Sphere);
        world.add_child(g, s).unwrap();
        assert_eq!(world.add_csg(CsgOp::Union, g, s), Err(ShapeError::CycleDetected));
        assert_eq!(
            world.add_csg(CsgOp::Difference, s, g),
            Err(ShapeError::CycleDetected)
        );
    }

    #[test]
    fn test_csg_detaches_operand_from_old_group() {
        let mut world = World::new();
        let g = world.add_group();
        let s = world.add_shape(Geometry::Sphere);
        world.add_child(g, s).unwrap();
        let c = world.add_shape(Geometry::Cube);

        let node = world.add_csg(CsgOp::Union, s, c).unwrap();
        assert_eq!(world.shape(s).unwrap().parent(), Some(node));
        match world.shape(g).unwrap().geometry() {
            Geometry::Group { children } => assert!(children.is_empty()),
            _ => unreachable!(),
        }
        assert!(world.bounds(g).unwrap().is_empty());
    }

    #[test]
    fn test_csg_operand_cannot_be_reused() {
        let mut world = World::new();
        let s1 = world.add_shape(Geometry::Sphere);
        let s2 = world.add_shape(Geometry::Cube);
        let s3 = world.add_shape(Geometry::Sphere);
        world.add_csg(CsgOp::Union, s1, s2).unwrap();

        assert_eq!(
            world.add_csg(CsgOp::Intersection, s1, s3),
            Err(ShapeError::OperandInUse)
        );
        let g = world.add_group();
        assert_eq!(world.add_child(g, s1), Err(ShapeError::OperandInUse));
    }

    #[test]
    fn test_csg_filter_keeps_boundary_events() {
        let mut world = World::new();
        let cases = [
            (CsgOp::Union, 0, 3),
            (CsgOp::Intersection, 1, 2),
            (CsgOp::Difference, 0, 1),
        ];
        for (op, k0, k1) in cases {
            let s1 = world.add_shape(Geometry::Sphere);
            let s2 = world.add_shape(Geometry::Cube);
            let node = world.add_csg(op, s1, s2).unwrap();
            let xs = [
                Intersection::new(1.0, s1),
                Intersection::new(2.0, s2),
                Intersection::new(3.0, s1),
                Intersection::new(4.0, s2),
            ];
            let (filter_op, left) = match world.shape(node).unwrap().geometry() {
                Geometry::Csg { op, left, .. } => (*op, *left),
                _ => unreachable!(),
            };
            let kept = world.filter_csg(filter_op, left, &xs);
            assert_eq!(kept.len(), 2, "op {op:?}");
            assert_eq!(kept[0], xs[k0], "op {op:?}");
            assert_eq!(kept[1], xs[k1], "op {op:?}");
        }
    }

    #[test]
    fn test_csg_union_of_two_spheres() {
        let mut world = World::new();
        let s1 = world.add_shape(Geometry::Sphere);
        let s2 = world.add_shape(Geometry::Sphere);
        world
            .set_transform(s2, Transform::translation(0.0, 0.0, 0.5))
            .unwrap();
        let node = world.add_csg(CsgOp::Union, s1, s2).unwrap();

        let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));
        let xs = world.intersect(node, &r).unwrap();
        assert_eq!(xs.len(), 2);
        assert_eq!(xs[0].t, 4.0);
        assert_eq!(xs[0].shape, s1);
        assert_eq!(xs[1].t, 6.5);
        assert_eq!(xs[1].shape, s2);
    }

    #[test]
    fn test_csg_miss_skips_operands() {
        let mut world = World::new();
        let s1 = world.add_shape(Geometry::Sphere);
        let s2 = world.add_shape(Geometry::Cube);
        let node = world.add_csg(CsgOp::Difference, s1, s2).unwrap();
        let r = Ray::new(Tuple::point(0.0, 5.0, -5.0), Tuple::vector(0.0, 1.0, 0.0));
        assert!(world.intersect(node, &r).unwrap().is_empty());
    }

    #[test]
    fn test_csg_has_no_normal() {
        let mut world = World::new();
        let s1 = world.add_shape(Geometry::Sphere);
        let s2 = world.add_shape(Geometry::Cube);
        let node = world.add_csg(CsgOp::Intersection, s1, s2).unwrap();
        assert_eq!(
            world.normal_at(node, &Tuple::point(0.0, 0.0, 0.0)),
            Err(ShapeError::CompositeHasNoNormal)
        );
    }

    #[test]
    fn test_pattern_anchors_to_object_space() {
        let mut world = World::new();
        let s = world.add_shape(Geometry::Sphere);
        world
            .set_transform(s, Transform::scaling(2.0, 2.0, 2.0))
            .unwrap();
        let mut material = Material::default();
        material.pattern = Pattern::stripe(Colour::WHITE, Colour::BLACK);
        world.set_material(s, Arc::new(material)).unwrap();
        let c = world
            .colour_at_object(s, &Tuple::point(1.5, 0.0, 0.0))
            .unwrap();
        assert_eq!(c, Colour::WHITE);
    }

    #[test]
    fn test_pattern_transform_composes_with_object_transform() {
        let mut world = World::new();
        let s = world.add_shape(Geometry::Sphere);
        world
            .set_transform(s, Transform::scaling(2.0, 2.0, 2.0))
            .unwrap();
        let mut material = Material::default();
        material.pattern = Pattern::stripe(Colour::WHITE, Colour::BLACK)
            .with_transform(Transform::translation(0.5, 0.0, 0.0));
        world.set_material(s, Arc::new(material)).unwrap();
        let c = world
            .colour_at_object(s, &Tuple::point(2.5, 0.0, 0.0))
            .unwrap();
        assert_eq!(c, Colour::WHITE);
    }

    #[test]
    fn test_lighting_through_world() {
        let mut world = World::new();
        let s = world.add_shape(Geometry::Sphere);
        let light = PointLight::new(Tuple::point(0.0, 0.0, -10.0), Colour::WHITE);
        let c = world
            .lighting(
                s,
                &light,
                &Tuple::point(0.0, 0.0, -1.0),
                &Tuple::vector(0.0, 0.0, -1.0),
                &Tuple::vector(0.0, 0.0, -1.0),
                false,
            )
            .unwrap();
        assert!(close(c.r, 1.9, 1e-5));
        assert!(close(c.g, 1.9, 1e-5));
        assert!(close(c.b, 1.9, 1e-5));
    }
}
