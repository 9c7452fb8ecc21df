//! Ember - CPU Monte Carlo path tracing.
//!
//! An offline renderer: scenes are aggregates of primitives with shared
//! materials, rays are traced per pixel sample, and radiance estimates
//! converge by importance-sampling light transport paths against a
//! mixture of light-aimed and material densities.

mod bucket;
mod camera;
mod cuboid;
mod hittable;
mod material;
mod pdf;
mod quad;
mod renderer;
mod sampling;
mod settings;
mod sphere;
mod texture;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, CameraError};
pub use cuboid::Cuboid;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Ceramic, Color, Dielectric, DiffuseLight, Fade, Isotropic, Lambertian, Material, Metal,
    Scatter, ScatterRecord, Suede, Weathering,
};
pub use pdf::Pdf;
pub use quad::Quad;
pub use renderer::{
    color_to_rgba, linear_to_gamma, ray_color, render, render_parallel, render_pixel, ImageBuffer,
    RenderConfig,
};
pub use sampling::{
    gen_f32, random_cosine_direction, random_in_unit_disk, random_to_sphere, random_unit_vector,
};
pub use settings::{RenderSettings, SettingsError};
pub use sphere::Sphere;
pub use texture::Texture;
pub use triangle::Triangle;

/// Re-export common math types
pub use ember_math::{Interval, Onb, Ray, Vec3};
