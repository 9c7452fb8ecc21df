//! Material set for surface scattering.
//!
//! The material kinds are fixed at design time, so the BSDF set is a
//! closed enum dispatched by match rather than a trait object hierarchy.
//! A scatter either yields a density for the integrator to weight by
//! (`Scatter::Pdf`) or fixes the outgoing ray outright
//! (`Scatter::Specular`), in which case no density is tracked.

use std::f32::consts::PI;
use std::sync::Arc;

use ember_math::{Ray, Vec3};
use rand::RngCore;

use crate::hittable::HitRecord;
use crate::pdf::Pdf;
use crate::sampling::{gen_f32, random_unit_vector};
use crate::texture::Texture;

/// Color type alias (linear RGB, typically 0-1 per channel)
pub type Color = Vec3;

/// How a scattered ray continues.
pub enum Scatter {
    /// The outgoing direction is drawn from this density; the integrator
    /// divides by it.
    Pdf(Pdf<'static>),
    /// The outgoing ray is already fixed; no density applies.
    Specular(Ray),
}

/// Result of a successful scatter.
pub struct ScatterRecord {
    pub attenuation: Color,
    pub scatter: Scatter,
}

pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
    DiffuseLight(DiffuseLight),
    Isotropic(Isotropic),
    Ceramic(Ceramic),
    Suede(Suede),
}

impl Material {
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian(Lambertian::new(albedo))
    }

    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Material::Metal(Metal::new(albedo, fuzz))
    }

    pub fn dielectric(refraction_index: f32) -> Self {
        Material::Dielectric(Dielectric::new(refraction_index))
    }

    pub fn diffuse_light(emit: Color) -> Self {
        Material::DiffuseLight(DiffuseLight::new(emit))
    }

    pub fn isotropic(albedo: Color) -> Self {
        Material::Isotropic(Isotropic::new(albedo))
    }

    pub fn ceramic(base: Color, shine: f32) -> Self {
        Material::Ceramic(Ceramic::new(base, shine))
    }

    pub fn suede(base: Color, roughness: f32) -> Self {
        Material::Suede(Suede::new(base, roughness))
    }

    /// Scatter the incoming ray at the hit point, or absorb it.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        match self {
            Material::Lambertian(m) => m.scatter(rec),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => m.scatter(ray_in, rec, rng),
            Material::DiffuseLight(_) => None,
            Material::Isotropic(m) => m.scatter(rec),
            Material::Ceramic(m) => m.scatter(ray_in, rec),
            Material::Suede(m) => m.scatter(ray_in, rec),
        }
    }

    /// Self-emission at the hit point. Zero for non-emitters.
    pub fn emitted(&self, rec: &HitRecord) -> Color {
        match self {
            Material::DiffuseLight(m) => m.emitted(rec),
            _ => Color::ZERO,
        }
    }

    /// Density with which `scatter` would have produced `scattered`.
    ///
    /// Must equal the sampling density of the returned `Scatter::Pdf` or
    /// the estimator's weighting breaks. Specular variants return zero:
    /// they never participate in density-weighted integration.
    pub fn scattering_pdf(&self, rec: &HitRecord, scattered: &Ray) -> f32 {
        match self {
            Material::Lambertian(_) | Material::Ceramic(_) | Material::Suede(_) => {
                cosine_density(rec.normal, scattered.direction)
            }
            Material::Isotropic(_) => 1.0 / (4.0 * PI),
            Material::Metal(_) | Material::Dielectric(_) | Material::DiffuseLight(_) => 0.0,
        }
    }
}

/// Vertical color fade applied on top of a lambertian albedo.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    /// Color blended in as height increases
    pub target: Color,
    /// Height at which the blend saturates
    pub span: f32,
}

/// Lambertian (diffuse) material with an optional height-based color fade.
pub struct Lambertian {
    albedo: Arc<Texture>,
    fade: Option<Fade>,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self::textured(Arc::new(Texture::solid(albedo)))
    }

    pub fn textured(albedo: Arc<Texture>) -> Self {
        Self { albedo, fade: None }
    }

    /// Albedo blended toward `target` as the hit point rises, a stylistic
    /// layer rather than a physical one.
    pub fn faded(albedo: Color, fade: Fade) -> Self {
        Self {
            albedo: Arc::new(Texture::solid(albedo)),
            fade: Some(fade),
        }
    }

    fn scatter(&self, rec: &HitRecord) -> Option<ScatterRecord> {
        let mut attenuation = self.albedo.value(rec.u, rec.v, rec.p);
        if let Some(fade) = self.fade {
            let t = (rec.p.y / fade.span).clamp(0.0, 1.0);
            attenuation = attenuation.lerp(fade.target, t);
        }

        Some(ScatterRecord {
            attenuation,
            scatter: Scatter::Pdf(Pdf::cosine(rec.normal)),
        })
    }
}

/// Position-dependent tint and roughness modulation for metal.
#[derive(Debug, Clone, Copy)]
pub struct Weathering {
    /// Color the albedo is pulled toward
    pub tint: Color,
    /// Spatial frequency of the tint modulation along x
    pub tint_frequency: f32,
    /// Height span over which fuzz picks up along z
    pub fuzz_span: f32,
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
    weathering: Option<Weathering>,
}

impl Metal {
    /// `fuzz` is clamped to [0, 1]; 0 is a perfect mirror.
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
            weathering: None,
        }
    }

    pub fn weathered(albedo: Color, fuzz: f32, weathering: Weathering) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
            weathering: Some(weathering),
        }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let (albedo, fuzz) = match self.weathering {
            Some(w) => {
                let t = (rec.p.x * w.tint_frequency).sin() * 0.5 + 0.5;
                (
                    self.albedo.lerp(w.tint, t),
                    (self.fuzz + rec.p.z / w.fuzz_span).clamp(0.0, 1.0),
                )
            }
            None => (self.albedo, self.fuzz),
        };

        let reflected = reflect(ray_in.direction.normalize(), rec.normal);
        let direction = reflected + fuzz * random_unit_vector(rng);

        // The perturbed reflection must stay in the normal's hemisphere
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterRecord {
            attenuation: albedo,
            scatter: Scatter::Specular(Ray::new(rec.p, direction, ray_in.time)),
        })
    }
}

/// Dielectric (glass) material. Attenuation is always white.
pub struct Dielectric {
    /// Index of refraction of the material, or the ratio over the
    /// enclosing medium's index
    refraction_index: f32,
}

impl Dielectric {
    pub fn new(refraction_index: f32) -> Self {
        Self { refraction_index }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let ri = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = ray_in.direction.normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection forces the reflect branch
        let cannot_refract = ri * sin_theta > 1.0;
        let direction = if cannot_refract || reflectance(cos_theta, ri) > gen_f32(rng) {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, ri)
        };

        Some(ScatterRecord {
            attenuation: Color::ONE,
            scatter: Scatter::Specular(Ray::new(rec.p, direction, ray_in.time)),
        })
    }
}

/// Diffuse area light. Emits on its front face only and never scatters.
pub struct DiffuseLight {
    emit: Arc<Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Color) -> Self {
        Self {
            emit: Arc::new(Texture::solid(emit)),
        }
    }

    pub fn textured(emit: Arc<Texture>) -> Self {
        Self { emit }
    }

    fn emitted(&self, rec: &HitRecord) -> Color {
        if !rec.front_face {
            return Color::ZERO;
        }
        self.emit.value(rec.u, rec.v, rec.p)
    }
}

/// Isotropic scattering for volumes: uniform over the whole sphere.
pub struct Isotropic {
    albedo: Arc<Texture>,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self {
            albedo: Arc::new(Texture::solid(albedo)),
        }
    }

    pub fn textured(albedo: Arc<Texture>) -> Self {
        Self { albedo }
    }

    fn scatter(&self, rec: &HitRecord) -> Option<ScatterRecord> {
        Some(ScatterRecord {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scatter: Scatter::Pdf(Pdf::uniform_sphere()),
        })
    }
}

/// Glazed ceramic: diffuse lobe with a view-dependent highlight pulled
/// toward white.
pub struct Ceramic {
    base: Color,
    shine: f32,
}

impl Ceramic {
    pub fn new(base: Color, shine: f32) -> Self {
        Self { base, shine }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord) -> Option<ScatterRecord> {
        let highlight = ray_in
            .direction
            .normalize()
            .dot(rec.normal)
            .max(0.0)
            .powf(20.0);
        let attenuation = self.base.lerp(Color::ONE, self.shine * highlight);

        Some(ScatterRecord {
            attenuation,
            scatter: Scatter::Pdf(Pdf::cosine(rec.normal)),
        })
    }
}

/// Suede: diffuse lobe with positional noise and a facing term in the
/// attenuation. `roughness` sets the spatial frequency of the noise.
pub struct Suede {
    base: Color,
    roughness: f32,
}

impl Suede {
    pub fn new(base: Color, roughness: f32) -> Self {
        Self { base, roughness }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord) -> Option<ScatterRecord> {
        let noise =
            0.7 + 0.3 * (self.roughness * (rec.p.x + rec.p.y + rec.p.z)).sin();
        let facing = rec.normal.dot(-ray_in.direction.normalize()).max(0.0);
        let attenuation = self.base * noise * (0.7 + 0.3 * facing);

        Some(ScatterRecord {
            attenuation,
            scatter: Scatter::Pdf(Pdf::cosine(rec.normal)),
        })
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface with the given index ratio.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance.
#[inline]
fn reflectance(cosine: f32, refraction_index: f32) -> f32 {
    let r0 = ((1.0 - refraction_index) / (1.0 + refraction_index)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Cosine-weighted hemisphere density about `normal`, clamped at zero.
#[inline]
fn cosine_density(normal: Vec3, direction: Vec3) -> f32 {
    let cos_theta = normal.dot(direction.normalize());
    (cos_theta / PI).max(0.0)
}
