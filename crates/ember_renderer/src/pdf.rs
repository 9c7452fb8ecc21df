//! Sampling densities over directions.
//!
//! Each density integrates to 1 over its domain, which is what keeps the
//! Monte Carlo estimate unbiased. The set of strategies is closed, so the
//! hierarchy is an enum dispatched by match. Densities that reference a
//! light aggregate borrow it; the surface-bound densities are borrow-free
//! (`Pdf<'static>`) and coerce into any shorter-lived mixture.

use std::f32::consts::PI;

use ember_math::{Onb, Vec3};
use rand::RngCore;

use crate::hittable::Hittable;
use crate::sampling::{gen_f32, random_cosine_direction, random_unit_vector};

pub enum Pdf<'a> {
    Cosine(CosinePdf),
    UniformSphere(UniformSpherePdf),
    Light(LightPdf<'a>),
    Mixture(MixturePdf<'a>),
}

impl<'a> Pdf<'a> {
    /// Cosine-weighted hemisphere density about `normal`.
    pub fn cosine(normal: Vec3) -> Pdf<'static> {
        Pdf::Cosine(CosinePdf {
            uvw: Onb::from_w(normal),
        })
    }

    /// Uniform density over the full sphere of directions.
    pub fn uniform_sphere() -> Pdf<'static> {
        Pdf::UniformSphere(UniformSpherePdf)
    }

    /// Density of sampling directions from `origin` toward `objects`.
    pub fn light(objects: &'a dyn Hittable, origin: Vec3) -> Pdf<'a> {
        Pdf::Light(LightPdf { objects, origin })
    }

    /// 50/50 mixture of two densities; itself a valid density.
    pub fn mixture(a: Pdf<'a>, b: Pdf<'a>) -> Pdf<'a> {
        Pdf::Mixture(MixturePdf {
            a: Box::new(a),
            b: Box::new(b),
        })
    }

    /// Density of `direction` under this strategy. Never negative.
    pub fn value(&self, direction: Vec3) -> f32 {
        match self {
            Pdf::Cosine(p) => {
                let cos_theta = direction.normalize().dot(p.uvw.w());
                (cos_theta / PI).max(0.0)
            }
            Pdf::UniformSphere(_) => 1.0 / (4.0 * PI),
            Pdf::Light(p) => p.objects.pdf_value(p.origin, direction),
            Pdf::Mixture(p) => 0.5 * p.a.value(direction) + 0.5 * p.b.value(direction),
        }
    }

    /// Draw a direction from this strategy.
    pub fn sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            Pdf::Cosine(p) => {
                let direction = p.uvw.local(random_cosine_direction(rng));
                // Degenerate draws fall back to the surface normal
                if direction.length_squared() < 1e-12 {
                    p.uvw.w()
                } else {
                    direction
                }
            }
            Pdf::UniformSphere(_) => random_unit_vector(rng),
            Pdf::Light(p) => p.objects.random(p.origin, rng),
            Pdf::Mixture(p) => {
                if gen_f32(rng) < 0.5 {
                    p.a.sample(rng)
                } else {
                    p.b.sample(rng)
                }
            }
        }
    }
}

pub struct CosinePdf {
    uvw: Onb,
}

pub struct UniformSpherePdf;

pub struct LightPdf<'a> {
    objects: &'a dyn Hittable,
    origin: Vec3,
}

pub struct MixturePdf<'a> {
    a: Box<Pdf<'a>>,
    b: Box<Pdf<'a>>,
}
