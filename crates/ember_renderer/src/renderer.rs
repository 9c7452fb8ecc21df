//! Core path tracing renderer.
//!
//! The radiance estimator importance-samples scatter directions from a
//! 50/50 mixture of a light-aimed density and the material's own density,
//! then weights each bounce by `attenuation * scattering_pdf / pdf_value`.
//! Specular materials bypass the density machinery entirely.

use std::path::Path;
use std::time::Instant;

use ember_math::{Interval, Ray};
use log::info;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::camera::Camera;
use crate::hittable::Hittable;
use crate::material::{Color, Scatter};
use crate::pdf::Pdf;

/// Densities below this contribute nothing rather than dividing.
const PDF_EPSILON: f32 = 1e-8;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel
    pub samples_per_pixel: u32,
    /// Maximum path length in bounces
    pub max_depth: u32,
    /// Radiance of rays that escape the scene
    pub background: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Color::ZERO,
        }
    }
}

/// Compute the radiance arriving along a ray.
///
/// The path is walked iteratively: `throughput` carries the product of
/// bounce weights and `radiance` accumulates emission scaled by it, so
/// the recursion depth of the estimator never touches the stack. The
/// walk stops at `max_depth` bounces, on a miss, on absorption, or when
/// the mixture density collapses.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut radiance = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..config.max_depth {
        let Some(rec) = world.hit(&ray, Interval::new(0.001, f32::INFINITY)) else {
            radiance += throughput * config.background;
            break;
        };

        radiance += throughput * rec.material.emitted(&rec);

        let Some(srec) = rec.material.scatter(&ray, &rec, rng) else {
            // Absorbed: emission alone
            break;
        };

        match srec.scatter {
            Scatter::Specular(specular) => {
                throughput *= srec.attenuation;
                ray = specular;
            }
            Scatter::Pdf(surface_pdf) => {
                let (direction, pdf_value) = match lights {
                    Some(lights) => {
                        let mixture = Pdf::mixture(Pdf::light(lights, rec.p), surface_pdf);
                        let direction = mixture.sample(rng);
                        (direction, mixture.value(direction))
                    }
                    // No lights: the mixture degenerates to the
                    // material's own density
                    None => {
                        let direction = surface_pdf.sample(rng);
                        (direction, surface_pdf.value(direction))
                    }
                };

                if pdf_value < PDF_EPSILON {
                    break;
                }

                let scattered = Ray::new(rec.p, direction, ray.time);
                let scattering_pdf = rec.material.scattering_pdf(&rec, &scattered);

                throughput *= srec.attenuation * scattering_pdf / pdf_value;
                ray = scattered;
            }
        }
    }

    radiance
}

/// Render a single pixel by averaging jittered samples.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, lights, config, rng);
    }

    pixel_color / config.samples_per_pixel as f32
}

/// Render the scene serially with the given generator.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> ImageBuffer {
    let start = Instant::now();
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height());

    for y in 0..image.height {
        for x in 0..image.width {
            let color = render_pixel(camera, world, lights, x, y, config, rng);
            image.set(x, y, color);
        }
    }

    info!(
        "rendered {}x{} @ {} spp in {:.2?}",
        image.width,
        image.height,
        config.samples_per_pixel,
        start.elapsed()
    );

    image
}

/// Render the scene across all cores, one spiral-ordered bucket at a time.
///
/// Each bucket gets its own generator seeded from `seed` and the bucket
/// index, so results are deterministic regardless of scheduling order and
/// no generator state is shared between workers.
pub fn render_parallel(
    camera: &Camera,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    config: &RenderConfig,
    seed: u64,
) -> ImageBuffer {
    let start = Instant::now();
    let buckets = generate_buckets(camera.image_width, camera.image_height(), DEFAULT_BUCKET_SIZE);
    info!(
        "rendering {}x{} @ {} spp across {} buckets",
        camera.image_width,
        camera.image_height(),
        config.samples_per_pixel,
        buckets.len()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let mut rng = StdRng::seed_from_u64(seed ^ (bucket.index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
            let pixels = render_bucket(bucket, camera, world, lights, config, &mut rng);
            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height());
    for result in &results {
        image.blit(result);
    }

    info!("render finished in {:.2?}", start.elapsed());

    image
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA with gamma correction.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * linear_to_gamma(color.x).clamp(0.0, 1.0)) as u8;
    let g = (255.0 * linear_to_gamma(color.y).clamp(0.0, 1.0)) as u8;
    let b = (255.0 * linear_to_gamma(color.z).clamp(0.0, 1.0)) as u8;
    [r, g, b, 255]
}

/// Render output: linear (pre-gamma) RGB radiance, row-major, top row first.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn blit(&mut self, result: &BucketResult) {
        let bucket = result.bucket;
        for local_y in 0..bucket.height {
            for local_x in 0..bucket.width {
                let color = result.pixels[(local_y * bucket.width + local_x) as usize];
                self.set(bucket.x + local_x, bucket.y + local_y, color);
            }
        }
    }

    /// Convert to gamma-corrected RGBA bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    /// Encode as PNG with gamma correction applied.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        let mut out = image::RgbImage::new(self.width, self.height);
        for (x, y, pixel) in out.enumerate_pixels_mut() {
            let [r, g, b, _] = color_to_rgba(self.get(x, y));
            *pixel = image::Rgb([r, g, b]);
        }
        out.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ember_math::Vec3;

    use crate::hittable::HittableList;
    use crate::material::Material;
    use crate::quad::Quad;
    use crate::sphere::Sphere;

    fn emissive_quad_scene() -> HittableList {
        // A 2x2 quad light at z = -2 facing the camera at the origin
        let light_mat = Arc::new(Material::diffuse_light(Color::new(15.0, 15.0, 15.0)));
        let mut world = HittableList::new();
        world.add(Arc::new(Quad::new(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            light_mat,
        )));
        world
    }

    fn camera_64() -> Camera {
        let mut camera = Camera::new()
            .with_image(1.0, 64)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize().unwrap();
        camera
    }

    #[test]
    fn test_direct_light_hit_returns_emission() {
        let world = emissive_quad_scene();
        let camera = camera_64();
        let config = RenderConfig {
            samples_per_pixel: 10,
            max_depth: 5,
            background: Color::ZERO,
        };

        let mut rng = StdRng::seed_from_u64(42);
        // The quad light covers the image center: its radiance arrives
        // undimmed on the primary ray.
        let center = render_pixel(&camera, &world, None, 32, 32, &config, &mut rng);
        assert!((center - Color::new(15.0, 15.0, 15.0)).length() < 1e-3);
    }

    #[test]
    fn test_rays_missing_light_are_black() {
        let world = emissive_quad_scene();
        let camera = camera_64();
        let config = RenderConfig {
            samples_per_pixel: 10,
            max_depth: 5,
            background: Color::ZERO,
        };

        let mut rng = StdRng::seed_from_u64(42);
        // Corner pixels look past the quad into the background
        let corner = render_pixel(&camera, &world, None, 0, 0, &config, &mut rng);
        assert_eq!(corner, Color::ZERO);
    }

    #[test]
    fn test_unit_index_dielectric_is_transparent() {
        // Glass with refraction index 1 in front of the light passes
        // rays through unchanged.
        let mut world = emissive_quad_scene();
        world.add(Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.4,
            Arc::new(Material::dielectric(1.0)),
        )));
        let camera = camera_64();
        let config = RenderConfig {
            samples_per_pixel: 20,
            max_depth: 8,
            background: Color::ZERO,
        };

        let mut rng = StdRng::seed_from_u64(42);
        let center = render_pixel(&camera, &world, None, 32, 32, &config, &mut rng);
        // Schlick reflectance at index 1 is (1 - cos)^5, negligible head-on
        assert!((center - Color::new(15.0, 15.0, 15.0)).length() < 0.5);
    }

    #[test]
    fn test_mirror_box_stays_finite_at_depth_cutoff() {
        // Perfect mirrors on all six faces: infinite bounce potential,
        // bounded by max_depth. With no emission anywhere the estimate
        // must be exactly black, never NaN or infinite.
        let mirror = Arc::new(Material::metal(Color::splat(0.99), 0.0));
        let mut world = HittableList::new();
        let s = 2.0;
        // Six quads enclosing the origin
        world.add(Arc::new(Quad::new(
            Vec3::new(-s, -s, -s),
            Vec3::new(2.0 * s, 0.0, 0.0),
            Vec3::new(0.0, 2.0 * s, 0.0),
            mirror.clone(),
        )));
        world.add(Arc::new(Quad::new(
            Vec3::new(-s, -s, s),
            Vec3::new(2.0 * s, 0.0, 0.0),
            Vec3::new(0.0, 2.0 * s, 0.0),
            mirror.clone(),
        )));
        world.add(Arc::new(Quad::new(
            Vec3::new(-s, -s, -s),
            Vec3::new(2.0 * s, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0 * s),
            mirror.clone(),
        )));
        world.add(Arc::new(Quad::new(
            Vec3::new(-s, s, -s),
            Vec3::new(2.0 * s, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0 * s),
            mirror.clone(),
        )));
        world.add(Arc::new(Quad::new(
            Vec3::new(-s, -s, -s),
            Vec3::new(0.0, 2.0 * s, 0.0),
            Vec3::new(0.0, 0.0, 2.0 * s),
            mirror.clone(),
        )));
        world.add(Arc::new(Quad::new(
            Vec3::new(s, -s, -s),
            Vec3::new(0.0, 2.0 * s, 0.0),
            Vec3::new(0.0, 0.0, 2.0 * s),
            mirror.clone(),
        )));

        let camera = camera_64();
        let config = RenderConfig {
            samples_per_pixel: 4,
            max_depth: 16,
            background: Color::ZERO,
        };

        let mut rng = StdRng::seed_from_u64(42);
        for (x, y) in [(0, 0), (32, 32), (63, 63)] {
            let color = render_pixel(&camera, &world, None, x, y, &config, &mut rng);
            assert!(color.is_finite());
            assert_eq!(color, Color::ZERO);
        }
    }

    #[test]
    fn test_light_sampling_matches_material_sampling() {
        // A diffuse floor lit by a small overhead light: estimates with
        // and without light importance sampling agree on average.
        let light_mat = Arc::new(Material::diffuse_light(Color::splat(4.0)));
        let light: Arc<Quad> = Arc::new(Quad::new(
            Vec3::new(-1.0, 2.0, -3.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            light_mat,
        ));

        let mut world = HittableList::new();
        world.add(Arc::new(Quad::new(
            Vec3::new(-4.0, -1.0, -6.0),
            Vec3::new(8.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 8.0),
            Arc::new(Material::lambertian(Color::splat(0.6))),
        )));
        world.add(light.clone());

        let lights: Arc<dyn Hittable> = light;

        let camera = {
            let mut c = Camera::new()
                .with_image(1.0, 32)
                .with_position(Vec3::new(0.0, 0.5, 1.0), Vec3::new(0.0, -0.5, -2.0), Vec3::Y)
                .with_lens(60.0, 0.0, 1.0);
            c.initialize().unwrap();
            c
        };
        let config = RenderConfig {
            samples_per_pixel: 2000,
            max_depth: 8,
            background: Color::ZERO,
        };

        let mut rng = StdRng::seed_from_u64(7);
        let with_lights =
            render_pixel(&camera, &world, Some(lights.as_ref()), 16, 20, &config, &mut rng);
        let without_lights = render_pixel(&camera, &world, None, 16, 20, &config, &mut rng);

        // Same integrand under two sampling strategies: the estimates
        // must agree well within Monte Carlo noise
        assert!(with_lights.length() > 0.0);
        assert!(without_lights.length() > 0.0);
        let ratio = with_lights.length() / without_lights.length();
        assert!(
            (0.5..=2.0).contains(&ratio),
            "with = {with_lights:?}, without = {without_lights:?}"
        );
    }

    #[test]
    fn test_render_parallel_matches_dimensions_and_content() {
        let world = emissive_quad_scene();
        let camera = camera_64();
        let config = RenderConfig {
            samples_per_pixel: 4,
            max_depth: 4,
            background: Color::ZERO,
        };

        let image = render_parallel(&camera, &world, None, &config, 42);
        assert_eq!(image.width, 64);
        assert_eq!(image.height, 64);
        // Center saw the light, the corner saw background
        assert!(image.get(32, 32).length() > 1.0);
        assert_eq!(image.get(0, 0), Color::ZERO);
    }

    #[test]
    fn test_render_parallel_is_deterministic_for_a_seed() {
        let world = emissive_quad_scene();
        let camera = camera_64();
        let config = RenderConfig {
            samples_per_pixel: 2,
            max_depth: 3,
            background: Color::new(0.1, 0.1, 0.1),
        };

        let a = render_parallel(&camera, &world, None, &config, 9);
        let b = render_parallel(&camera, &world, None, &config, 9);
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-5);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-5);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
    }

    #[test]
    fn test_color_to_rgba_clamps() {
        let rgba = color_to_rgba(Color::new(20.0, -3.0, 1.0));
        assert_eq!(rgba, [255, 0, 255, 255]);
    }

    #[test]
    fn test_image_buffer_roundtrip() {
        let mut image = ImageBuffer::new(4, 3);
        image.set(3, 2, Color::new(0.5, 0.25, 1.0));
        assert_eq!(image.get(3, 2), Color::new(0.5, 0.25, 1.0));
        assert_eq!(image.get(0, 0), Color::ZERO);
        assert_eq!(image.to_rgba().len(), 4 * 3 * 4);
    }
}
