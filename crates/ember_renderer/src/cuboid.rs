//! Axis-aligned box primitive.
//!
//! Slab intersection against the three axis pairs. Division by a zero
//! direction component yields signed infinities whose comparisons reject
//! the slab correctly, so no special casing is needed; a NaN from an
//! origin exactly on a face compares false everywhere and leaves the
//! running interval untouched.

use std::sync::Arc;

use ember_math::{Interval, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;

/// Tolerance for classifying which face a hit point lies on.
const FACE_EPSILON: f32 = 1e-4;

pub struct Cuboid {
    min: Vec3,
    max: Vec3,
    material: Arc<Material>,
}

impl Cuboid {
    /// Create a box from two opposite corners.
    pub fn new(a: Vec3, b: Vec3, material: Arc<Material>) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
            material,
        }
    }

    fn axis_unit(axis: usize) -> Vec3 {
        match axis {
            0 => Vec3::X,
            1 => Vec3::Y,
            _ => Vec3::Z,
        }
    }
}

impl Hittable for Cuboid {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut t_min = ray_t.min;
        let mut t_max = ray_t.max;

        for axis in 0..3 {
            let inv_d = 1.0 / ray.direction[axis];
            let mut t0 = (self.min[axis] - ray.origin[axis]) * inv_d;
            let mut t1 = (self.max[axis] - ray.origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            if t0 > t_min {
                t_min = t0;
            }
            if t1 < t_max {
                t_max = t1;
            }
            if t_max <= t_min {
                return None;
            }
        }

        let t = t_min;
        let p = ray.at(t);

        // Face selection by nearest plane within tolerance. Exact edge and
        // corner hits resolve to whichever face tests last; interior
        // origins can leave the normal zero. Known approximation, kept
        // because changing it changes rendered output.
        let mut outward_normal = Vec3::ZERO;
        for axis in 0..3 {
            if (p[axis] - self.min[axis]).abs() < FACE_EPSILON {
                outward_normal = -Self::axis_unit(axis);
            }
            if (p[axis] - self.max[axis]).abs() < FACE_EPSILON {
                outward_normal = Self::axis_unit(axis);
            }
        }

        Some(HitRecord::new(
            ray,
            t,
            p,
            outward_normal,
            (0.0, 0.0),
            self.material.as_ref(),
        ))
    }
}
