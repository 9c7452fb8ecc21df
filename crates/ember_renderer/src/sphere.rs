//! Sphere primitive.

use std::f32::consts::PI;
use std::sync::Arc;

use ember_math::{Interval, Onb, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use crate::sampling::random_to_sphere;

pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    /// UV coordinates for a point on the unit sphere: phi around +Y from
    /// -X, theta down from +Y, both mapped into [0, 1].
    fn sphere_uv(p: Vec3) -> (f32, f32) {
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root in the acceptable range, else the far one
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = ray.at(root);
        let outward_normal = (p - self.center) / self.radius;
        let uv = Self::sphere_uv(outward_normal);

        Some(HitRecord::new(
            ray,
            root,
            p,
            outward_normal,
            uv,
            self.material.as_ref(),
        ))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        // Only meaningful for origins outside the sphere
        let ray = Ray::new_simple(origin, direction);
        if self.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none() {
            return 0.0;
        }

        let distance_squared = (self.center - origin).length_squared();
        let cos_theta_max = (1.0 - self.radius * self.radius / distance_squared).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);

        1.0 / solid_angle
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center - origin;
        let distance_squared = direction.length_squared();
        let uvw = Onb::from_w(direction);
        uvw.local(random_to_sphere(self.radius, distance_squared, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_sphere_at(center: Vec3) -> Sphere {
        Sphere::new(
            center,
            1.0,
            Arc::new(Material::lambertian(Color::splat(0.5))),
        )
    }

    #[test]
    fn test_hit_reports_nearest_root() {
        let sphere = unit_sphere_at(Vec3::new(0.0, 0.0, -3.0));
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);

        let rec = sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-5);
        assert!(rec.front_face);
    }

    #[test]
    fn test_hit_point_lies_on_surface_with_radial_normal() {
        let center = Vec3::new(1.0, -2.0, -5.0);
        let sphere = Sphere::new(
            center,
            1.5,
            Arc::new(Material::lambertian(Color::splat(0.5))),
        );

        let directions = [
            Vec3::new(0.2, -0.4, -1.0),
            Vec3::new(0.1, -0.3, -1.0),
            Vec3::new(0.25, -0.5, -1.2),
        ];
        for d in directions {
            let ray = Ray::new_simple(Vec3::ZERO, d);
            let rec = sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();

            assert!(((rec.p - center).length() - 1.5).abs() < 1e-3);
            let expected = (rec.p - center) / 1.5;
            assert!((rec.normal - expected).length() < 1e-3);
            assert!((rec.normal.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_interior_ray_flips_normal() {
        let sphere = unit_sphere_at(Vec3::ZERO);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);

        let rec = sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!(!rec.front_face);
        // Normal points against the ray, back toward the center
        assert!((rec.normal - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_miss() {
        let sphere = unit_sphere_at(Vec3::new(0.0, 0.0, -5.0));
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);

        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_interval_excludes_hit() {
        let sphere = unit_sphere_at(Vec3::new(0.0, 0.0, -5.0));
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);

        assert!(sphere.hit(&ray, Interval::new(0.001, 3.0)).is_none());
    }

    #[test]
    fn test_uv_ranges() {
        let (u, v) = Sphere::sphere_uv(Vec3::Y);
        assert!((v - 1.0).abs() < 1e-5);
        assert!((0.0..=1.0).contains(&u));

        let (u, v) = Sphere::sphere_uv(Vec3::X);
        assert!((u - 0.5).abs() < 1e-5);
        assert!((v - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_pdf_value_matches_visible_cone() {
        let sphere = unit_sphere_at(Vec3::new(0.0, 0.0, -2.0));

        let toward = sphere.pdf_value(Vec3::ZERO, Vec3::NEG_Z);
        let cos_theta_max = (1.0f32 - 1.0 / 4.0).sqrt();
        let expected = 1.0 / (2.0 * PI * (1.0 - cos_theta_max));
        assert!((toward - expected).abs() < 1e-4);

        assert_eq!(sphere.pdf_value(Vec3::ZERO, Vec3::Z), 0.0);
    }

    #[test]
    fn test_random_directions_hit_the_sphere() {
        let sphere = unit_sphere_at(Vec3::new(0.0, 0.0, -4.0));
        let mut rng = StdRng::seed_from_u64(13);

        for _ in 0..200 {
            let d = sphere.random(Vec3::ZERO, &mut rng);
            let ray = Ray::new_simple(Vec3::ZERO, d);
            assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_some());
        }
    }
}
