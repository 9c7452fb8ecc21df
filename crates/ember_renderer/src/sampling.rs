//! Random direction sampling helpers.
//!
//! Every routine takes the generator explicitly so callers control which
//! generator feeds the hot path; nothing here touches global RNG state.

use std::f32::consts::PI;

use ember_math::Vec3;
use rand::{Rng, RngCore};

/// Generate a uniform random f32 in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen()
}

/// Generate a random unit vector on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling for a uniform distribution on the sphere
    loop {
        let v = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Sample a random point in the unit disk (z = 0).
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f32(rng) * 2.0 - 1.0, gen_f32(rng) * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Sample a cosine-weighted direction about +Z.
pub fn random_cosine_direction(rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);

    let phi = 2.0 * PI * r1;
    let x = phi.cos() * r2.sqrt();
    let y = phi.sin() * r2.sqrt();
    let z = (1.0 - r2).sqrt();

    Vec3::new(x, y, z)
}

/// Sample a direction toward a sphere of `radius` whose center lies
/// `distance_squared` away along +Z, uniform over the visible cone.
pub fn random_to_sphere(radius: f32, distance_squared: f32, rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);
    let z = 1.0 + r2 * ((1.0 - radius * radius / distance_squared).sqrt() - 1.0);

    let phi = 2.0 * PI * r1;
    let x = phi.cos() * (1.0 - z * z).sqrt();
    let y = phi.sin() * (1.0 - z * z).sqrt();

    Vec3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_random_in_unit_disk_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let p = random_in_unit_disk(&mut rng);
            assert!(p.length_squared() < 1.0);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_random_cosine_direction_upper_hemisphere() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let v = random_cosine_direction(&mut rng);
            assert!(v.z >= 0.0);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_random_to_sphere_within_cone() {
        let mut rng = StdRng::seed_from_u64(7);
        // Sphere of radius 1 at distance 2: cone half-angle cos is sqrt(3)/2.
        let cos_theta_max = (1.0f32 - 1.0 / 4.0).sqrt();
        for _ in 0..100 {
            let v = random_to_sphere(1.0, 4.0, &mut rng);
            assert!(v.z >= cos_theta_max - 1e-4);
        }
    }
}
