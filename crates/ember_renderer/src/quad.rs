//! Planar quadrilateral primitive.

use std::sync::Arc;

use ember_math::{Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use crate::sampling::gen_f32;

/// A parallelogram spanned by two edge vectors from an origin corner.
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    // Cached plane data
    w: Vec3,
    normal: Vec3,
    d: f32,
    area: f32,
    material: Arc<Material>,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();

        Self {
            q,
            u,
            v,
            w: n / n.dot(n),
            normal,
            d: normal.dot(q),
            area: n.length(),
            material,
        }
    }
}

impl Hittable for Quad {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let denom = self.normal.dot(ray.direction);

        // Parallel to the supporting plane
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin)) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        // Planar coordinates of the hit within the quad's basis
        let p = ray.at(t);
        let planar = p - self.q;
        let alpha = self.w.dot(planar.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar));

        if !(0.0..=1.0).contains(&alpha) || !(0.0..=1.0).contains(&beta) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            p,
            self.normal,
            (alpha, beta),
            self.material.as_ref(),
        ))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let ray = Ray::new_simple(origin, direction);
        let Some(rec) = self.hit(&ray, Interval::new(0.001, f32::INFINITY)) else {
            return 0.0;
        };

        // Convert the surface-area density 1/area to solid angle
        let distance_squared = rec.t * rec.t * direction.length_squared();
        let cosine = (direction.dot(rec.normal) / direction.length()).abs();

        distance_squared / (cosine * self.area)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let p = self.q + gen_f32(rng) * self.u + gen_f32(rng) * self.v;
        p - origin
    }
}
