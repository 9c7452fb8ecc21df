//! Triangle primitive.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.
//! Shading is flat: the normal is the face normal, not interpolated.

use std::sync::Arc;

use ember_math::{Interval, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;

/// Rays closer than this to the triangle's plane are treated as parallel.
const DETERMINANT_EPSILON: f32 = 1e-8;

pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    material: Arc<Material>,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<Material>) -> Self {
        Self {
            v0,
            v1,
            v2,
            material,
        }
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(edge2);
        let det = edge1.dot(h);
        if det.abs() < DETERMINANT_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - self.v0;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = inv_det * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * edge2.dot(q);
        if !ray_t.contains(t) {
            return None;
        }

        let outward_normal = edge1.cross(edge2).normalize();

        Some(HitRecord::new(
            ray,
            t,
            ray.at(t),
            outward_normal,
            (u, v),
            self.material.as_ref(),
        ))
    }
}
