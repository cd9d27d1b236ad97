//! Object-space intersection and normal formulas for primitive shapes.
//!
//! Every primitive here is the canonical unit version of itself: the
//! sphere has radius 1 at the origin, the plane spans x/z at y = 0, the
//! cube runs corner to corner from (-1,-1,-1) to (1,1,1), cylinders and
//! cones are y-axis aligned with unit radius at |y| = 1. Arbitrary
//! placements come from the owning shape's transform.

use lucent_math::{Tuple, EPSILON};

use crate::ray::Ray;

pub(crate) fn sphere_intersect(ray: &Ray) -> Vec<f64> {
    let sphere_to_ray = ray.origin - Tuple::point(0.0, 0.0, 0.0);
    let a = ray.direction.dot(&ray.direction);
    let b = 2.0 * ray.direction.dot(&sphere_to_ray);
    let c = sphere_to_ray.dot(&sphere_to_ray) - 1.0;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }
    let sqrt_disc = discriminant.sqrt();
    vec![(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)]
}

pub(crate) fn sphere_normal(point: &Tuple) -> Tuple {
    *point - Tuple::point(0.0, 0.0, 0.0)
}

pub(crate) fn plane_intersect(ray: &Ray) -> Vec<f64> {
    // Parallel (or coplanar) rays never produce a countable hit.
    if ray.direction.y.abs() < EPSILON {
        return Vec::new();
    }
    vec![-ray.origin.y / ray.direction.y]
}

pub(crate) fn plane_normal() -> Tuple {
    Tuple::vector(0.0, 1.0, 0.0)
}

pub(crate) fn cube_intersect(ray: &Ray) -> Vec<f64> {
    let (xt_min, xt_max) = check_axis(ray.origin.x, ray.direction.x, -1.0, 1.0);
    let (yt_min, yt_max) = check_axis(ray.origin.y, ray.direction.y, -1.0, 1.0);
    let (zt_min, zt_max) = check_axis(ray.origin.z, ray.direction.z, -1.0, 1.0);

    let t_min = xt_min.max(yt_min).max(zt_min);
    let t_max = xt_max.min(yt_max).min(zt_max);

    if t_min > t_max {
        Vec::new()
    } else {
        vec![t_min, t_max]
    }
}

pub(crate) fn cube_normal(point: &Tuple) -> Tuple {
    let max_c = point.x.abs().max(point.y.abs()).max(point.z.abs());
    if max_c == point.x.abs() {
        Tuple::vector(point.x, 0.0, 0.0)
    } else if max_c == point.y.abs() {
        Tuple::vector(0.0, point.y, 0.0)
    } else {
        Tuple::vector(0.0, 0.0, point.z)
    }
}

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

/// True if the ray at `t` lies within `radius` of the y axis.
fn check_cap(ray: &Ray, t: f64, radius: f64) -> bool {
    let x = ray.origin.x + t * ray.direction.x;
    let z = ray.origin.z + t * ray.direction.z;
    x * x + z * z <= radius * radius
}

pub(crate) fn cylinder_intersect(minimum: f64, maximum: f64, closed: bool, ray: &Ray) -> Vec<f64> {
    let mut xs = Vec::new();

    let a = ray.direction.x * ray.direction.x + ray.direction.z * ray.direction.z;
    if a.abs() >= EPSILON {
        let b = 2.0 * (ray.origin.x * ray.direction.x + ray.origin.z * ray.direction.z);
        let c = ray.origin.x * ray.origin.x + ray.origin.z * ray.origin.z - 1.0;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant >= 0.0 {
            let sqrt_disc = discriminant.sqrt();
            for t in [(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)] {
                let y = ray.origin.y + t * ray.direction.y;
                if minimum < y && y < maximum {
                    xs.push(t);
                }
            }
        }
    }

    if closed && ray.direction.y.abs() >= EPSILON {
        for plane_y in [minimum, maximum] {
            let t = (plane_y - ray.origin.y) / ray.direction.y;
            if check_cap(ray, t, 1.0) {
                xs.push(t);
            }
        }
    }

    xs.sort_by(|a, b| a.total_cmp(b));
    xs
}

pub(crate) fn cylinder_normal(minimum: f64, maximum: f64, closed: bool, point: &Tuple) -> Tuple {
    let dist = point.x * point.x + point.z * point.z;
    if closed && dist < 1.0 && point.y >= maximum - EPSILON {
        Tuple::vector(0.0, 1.0, 0.0)
    } else if closed && dist < 1.0 && point.y <= minimum + EPSILON {
        Tuple::vector(0.0, -1.0, 0.0)
    } else {
        Tuple::vector(point.x, 0.0, point.z)
    }
}

pub(crate) fn cone_intersect(minimum: f64, maximum: f64, closed: bool, ray: &Ray) -> Vec<f64> {
    let mut xs = Vec::new();

    let d = &ray.direction;
    let o = &ray.origin;
    let a = d.x * d.x - d.y * d.y + d.z * d.z;
    let b = 2.0 * (o.x * d.x - o.y * d.y + o.z * d.z);
    let c = o.x * o.x - o.y * o.y + o.z * o.z;

    let push_in_range = |t: f64, xs: &mut Vec<f64>| {
        let y = o.y + t * d.y;
        if minimum < y && y < maximum {
            xs.push(t);
        }
    };

    if a.abs() < EPSILON {
        // Ray parallel to one half of the double cone: a single hit on
        // the other half, unless b vanishes too.
        if b.abs() >= EPSILON {
            push_in_range(-c / (2.0 * b), &mut xs);
        }
    } else {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant >= 0.0 {
            let sqrt_disc = discriminant.sqrt();
            let (t0, t1) = ((-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a));
            push_in_range(t0, &mut xs);
            push_in_range(t1, &mut xs);
        }
    }

    if closed && ray.direction.y.abs() >= EPSILON {
        // Cap radius equals the cone's |y| at the truncation plane.
        for plane_y in [minimum, maximum] {
            let t = (plane_y - ray.origin.y) / ray.direction.y;
            if check_cap(ray, t, plane_y.abs()) {
                xs.push(t);
            }
        }
    }

    xs.sort_by(|a, b| a.total_cmp(b));
    xs
}

pub(crate) fn cone_normal(minimum: f64, maximum: f64, closed: bool, point: &Tuple) -> Tuple {
    let dist = point.x * point.x + point.z * point.z;
    if closed && dist < maximum * maximum && point.y >= maximum - EPSILON {
        Tuple::vector(0.0, 1.0, 0.0)
    } else if closed && dist < minimum * minimum && point.y <= minimum + EPSILON {
        Tuple::vector(0.0, -1.0, 0.0)
    } else {
        let mut y = dist.sqrt();
        if point.y > 0.0 {
            y = -y;
        }
        Tuple::vector(point.x, y, point.z)
    }
}
