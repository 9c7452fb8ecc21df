//! Camera for primary ray generation.

use ember_math::{Ray, Vec3};
use rand::RngCore;
use thiserror::Error;

use crate::sampling::{gen_f32, random_in_unit_disk};

/// Errors for camera configurations the renderer cannot work with.
#[derive(Debug, Error, PartialEq)]
pub enum CameraError {
    #[error("image width must be nonzero")]
    ZeroImageWidth,

    #[error("aspect ratio must be positive and finite")]
    InvalidAspectRatio,

    #[error("lookfrom and lookat coincide")]
    DegenerateView,

    #[error("vup is parallel to the view direction")]
    DegenerateUp,
}

/// Camera generating rays into the scene.
///
/// Configure with the builder methods, then call [`Camera::initialize`]
/// before generating rays.
#[derive(Clone)]
pub struct Camera {
    // Image settings
    pub aspect_ratio: f32,
    pub image_width: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,          // Vertical field of view in degrees
    defocus_angle: f32, // Variation angle of rays through each pixel, degrees
    focus_dist: f32,    // Distance from camera to plane of perfect focus

    // Cached computed values (set by initialize())
    image_height: u32,
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Create a camera with default settings.
    pub fn new() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 800,
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 1.0,
            image_height: 0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Set the aspect ratio and image width; the height is derived.
    pub fn with_image(mut self, aspect_ratio: f32, image_width: u32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self.image_width = image_width;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings. A defocus angle of 0 disables depth of field.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Validate the configuration and compute the viewport basis.
    /// Must be called before [`Camera::get_ray`].
    pub fn initialize(&mut self) -> Result<(), CameraError> {
        if self.image_width == 0 {
            return Err(CameraError::ZeroImageWidth);
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(CameraError::InvalidAspectRatio);
        }

        let view = self.look_from - self.look_at;
        if view.length_squared() < 1e-12 {
            return Err(CameraError::DegenerateView);
        }

        self.image_height = ((self.image_width as f32 / self.aspect_ratio) as u32).max(1);
        self.center = self.look_from;

        // Viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Camera basis vectors
        self.w = view.normalize();
        let up_cross = self.vup.cross(self.w);
        if up_cross.length_squared() < 1e-12 {
            return Err(CameraError::DegenerateUp);
        }
        self.u = up_cross.normalize();
        self.v = self.w.cross(self.u);

        // Viewport edge vectors and per-pixel deltas
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;
        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        Ok(())
    }

    /// Image height derived from the aspect ratio, available after
    /// [`Camera::initialize`].
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Generate a ray for pixel (i, j), jittered within the pixel footprint.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new_simple(ray_origin, pixel_sample - ray_origin)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_initialize_derives_height_from_aspect() {
        let mut camera = Camera::new().with_image(2.0, 800);
        camera.initialize().unwrap();
        assert_eq!(camera.image_height(), 400);

        let mut tall = Camera::new().with_image(0.01, 4);
        tall.initialize().unwrap();
        assert_eq!(tall.image_height(), 400);

        let mut tiny = Camera::new().with_image(100.0, 10);
        tiny.initialize().unwrap();
        assert_eq!(tiny.image_height(), 1);
    }

    #[test]
    fn test_initialize_rejects_bad_configs() {
        let mut zero_width = Camera::new().with_image(1.0, 0);
        assert_eq!(zero_width.initialize(), Err(CameraError::ZeroImageWidth));

        let mut bad_aspect = Camera::new().with_image(-1.0, 100);
        assert_eq!(bad_aspect.initialize(), Err(CameraError::InvalidAspectRatio));

        let mut degenerate =
            Camera::new().with_position(Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 1.0), Vec3::Y);
        assert_eq!(degenerate.initialize(), Err(CameraError::DegenerateView));

        let mut parallel_up = Camera::new().with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Z);
        assert_eq!(parallel_up.initialize(), Err(CameraError::DegenerateUp));
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let mut camera = Camera::new()
            .with_image(1.0, 100)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize().unwrap();

        let mut rng = StdRng::seed_from_u64(42);
        let ray = camera.get_ray(50, 50, &mut rng);
        assert!(ray.direction.z < 0.0);
        assert!(ray.direction.x.abs() < 0.1 * ray.direction.z.abs());
        assert_eq!(ray.origin, Vec3::ZERO);
    }

    #[test]
    fn test_defocus_moves_ray_origin() {
        let mut camera = Camera::new()
            .with_image(1.0, 64)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(60.0, 10.0, 3.0);
        camera.initialize().unwrap();

        let mut rng = StdRng::seed_from_u64(42);
        let mut moved = false;
        for _ in 0..16 {
            let ray = camera.get_ray(32, 32, &mut rng);
            if ray.origin.length() > 1e-6 {
                moved = true;
            }
        }
        assert!(moved);
    }

    #[test]
    fn test_zero_defocus_pins_origin() {
        let mut camera = Camera::new()
            .with_image(1.0, 64)
            .with_position(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(60.0, 0.0, 1.0);
        camera.initialize().unwrap();

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..16 {
            let ray = camera.get_ray(10, 10, &mut rng);
            assert_eq!(ray.origin, Vec3::new(1.0, 2.0, 3.0));
        }
    }
}
