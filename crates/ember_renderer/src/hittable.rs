//! Hittable trait, HitRecord, and the linear aggregate.

use std::sync::Arc;

use ember_math::{Interval, Ray, Vec3};
use rand::RngCore;

use crate::material::Material;
use crate::sampling::gen_f32;

/// Record of a ray-object intersection.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at the intersection, unit length, always oriented
    /// against the incoming ray
    pub normal: Vec3,
    /// Ray parameter at the intersection
    pub t: f32,
    /// Surface parameterization for texture lookup
    pub u: f32,
    pub v: f32,
    /// Whether the geometric normal already faced the ray (outside hit)
    pub front_face: bool,
    /// Material of the hit primitive
    pub material: &'a Material,
}

impl<'a> HitRecord<'a> {
    /// Build a record from the geometric (outward) normal, flipping it
    /// so the stored normal points against the ray. Every material's
    /// scatter computation assumes this orientation.
    pub fn new(
        ray: &Ray,
        t: f32,
        p: Vec3,
        outward_normal: Vec3,
        (u, v): (f32, f32),
        material: &'a Material,
    ) -> Self {
        let front_face = ray.direction.dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            p,
            normal,
            t,
            u,
            v,
            front_face,
            material,
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test the ray against this object, returning the closest hit whose
    /// parameter lies within `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    /// Solid-angle density of sampling `direction` from `origin` toward
    /// this object. Zero for shapes that cannot be importance-sampled.
    fn pdf_value(&self, _origin: Vec3, _direction: Vec3) -> f32 {
        0.0
    }

    /// Sample a direction from `origin` toward this object.
    fn random(&self, _origin: Vec3, _rng: &mut dyn RngCore) -> Vec3 {
        Vec3::X
    }
}

/// An unordered collection of hittables sharing the intersection contract.
///
/// Intersection is a linear scan; cost grows with primitive count. Objects
/// are reference-counted so a light list can alias members of the world.
#[derive(Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest_so_far = ray_t.max;
        let mut closest_hit = None;

        for object in &self.objects {
            let interval = Interval::new(ray_t.min, closest_so_far);
            if let Some(rec) = object.hit(ray, interval) {
                closest_so_far = rec.t;
                closest_hit = Some(rec);
            }
        }

        closest_hit
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        if self.objects.is_empty() {
            return 0.0;
        }

        let weight = 1.0 / self.objects.len() as f32;
        self.objects
            .iter()
            .map(|object| weight * object.pdf_value(origin, direction))
            .sum()
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        if self.objects.is_empty() {
            return Vec3::X;
        }

        let index = ((gen_f32(rng) * self.objects.len() as f32) as usize)
            .min(self.objects.len() - 1);
        self.objects[index].random(origin, rng)
    }
}
