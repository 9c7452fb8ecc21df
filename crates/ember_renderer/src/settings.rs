//! Declarative render settings.
//!
//! The recognized options cover camera placement, lens, sampling quality,
//! and the background color. Missing fields fall back to defaults, so a
//! settings file only needs to state what it changes.

use std::path::Path;

use ember_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::{Camera, CameraError};
use crate::renderer::RenderConfig;

/// Errors that can occur while loading or applying settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid camera configuration: {0}")]
    Camera(#[from] CameraError),

    #[error("samples_per_pixel and max_depth must be nonzero")]
    ZeroQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub aspect_ratio: f32,
    pub image_width: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub vfov: f32,
    pub lookfrom: [f32; 3],
    pub lookat: [f32; 3],
    pub vup: [f32; 3],
    pub defocus_angle: f32,
    pub focus_dist: f32,
    pub background: [f32; 3],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 400,
            samples_per_pixel: 100,
            max_depth: 50,
            vfov: 90.0,
            lookfrom: [0.0, 0.0, 0.0],
            lookat: [0.0, 0.0, -1.0],
            vup: [0.0, 1.0, 0.0],
            defocus_angle: 0.0,
            focus_dist: 1.0,
            background: [0.0, 0.0, 0.0],
        }
    }
}

impl RenderSettings {
    /// Parse settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Validate the settings and build the camera and render config.
    pub fn build(&self) -> Result<(Camera, RenderConfig), SettingsError> {
        if self.samples_per_pixel == 0 || self.max_depth == 0 {
            return Err(SettingsError::ZeroQuality);
        }

        let mut camera = Camera::new()
            .with_image(self.aspect_ratio, self.image_width)
            .with_position(
                Vec3::from_array(self.lookfrom),
                Vec3::from_array(self.lookat),
                Vec3::from_array(self.vup),
            )
            .with_lens(self.vfov, self.defocus_angle, self.focus_dist);
        camera.initialize()?;

        let config = RenderConfig {
            samples_per_pixel: self.samples_per_pixel,
            max_depth: self.max_depth,
            background: Vec3::from_array(self.background),
        };

        Ok((camera, config))
    }
}
