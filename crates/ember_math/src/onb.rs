use crate::Vec3;

/// An orthonormal basis built around a single direction.
///
/// Used to transform directions sampled in a canonical frame (z up)
/// into the frame of a surface normal.
#[derive(Debug, Clone, Copy)]
pub struct Onb {
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Onb {
    /// Build a basis whose w axis points along `n` (need not be unit length).
    pub fn from_w(n: Vec3) -> Self {
        let w = n.normalize();
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { u, v, w }
    }

    pub fn u(&self) -> Vec3 {
        self.u
    }

    pub fn v(&self) -> Vec3 {
        self.v
    }

    pub fn w(&self) -> Vec3 {
        self.w
    }

    /// Transform a vector expressed in this basis into world space.
    pub fn local(&self, a: Vec3) -> Vec3 {
        a.x * self.u + a.y * self.v + a.z * self.w
    }
}
