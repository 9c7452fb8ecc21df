//! Textures evaluated at a surface parameterization.
//!
//! The set of texture kinds is closed, so lookup dispatches by match.
//! Textures are shared across materials behind `Arc` and never mutated.

use ember_math::Vec3;

use crate::material::Color;

#[derive(Debug, Clone)]
pub enum Texture {
    /// A constant color everywhere.
    Solid { albedo: Color },
    /// A two-color checker in 3D space.
    Checker {
        inv_scale: f32,
        even: Color,
        odd: Color,
    },
}

impl Texture {
    pub fn solid(albedo: Color) -> Self {
        Texture::Solid { albedo }
    }

    pub fn checker(scale: f32, even: Color, odd: Color) -> Self {
        Texture::Checker {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    /// Evaluate the texture at surface coordinates (u, v) and point p.
    pub fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        match self {
            Texture::Solid { albedo } => *albedo,
            Texture::Checker {
                inv_scale,
                even,
                odd,
            } => {
                let x = (inv_scale * p.x).floor() as i64;
                let y = (inv_scale * p.y).floor() as i64;
                let z = (inv_scale * p.z).floor() as i64;

                if (x + y + z) % 2 == 0 {
                    *even
                } else {
                    *odd
                }
            }
        }
    }
}
