//! Minimal 2D affine matrix for frame conversions.
//!
//! Used by export's cut-out composition to express one element's transform in
//! another element's local coordinate frame. Row-major 2×3 layout augmenting
//! to the homogeneous 3×3 `[a c e; b d f; 0 0 1]`.

#[cfg(test)]
#[path = "matrix_test.rs"]
mod matrix_test;

use crate::camera::Point;
use crate::element::Transform;

/// Determinant magnitude below which a matrix is treated as degenerate.
const DEGENERATE_DET: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Mat {
    pub const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    #[must_use]
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self { e: tx, f: ty, ..Self::IDENTITY }
    }

    #[must_use]
    pub fn rotation_deg(deg: f64) -> Self {
        let (sin, cos) = deg.to_radians().sin_cos();
        Self { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 }
    }

    #[must_use]
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self { a: sx, d: sy, ..Self::IDENTITY }
    }

    /// Build the element-to-world matrix for a transform: translate × rotate ×
    /// scale, matching the order the renderer applies components in.
    #[must_use]
    pub fn from_transform(t: &Transform) -> Self {
        Self::translation(t.x_mm, t.y_mm)
            .mul(&Self::rotation_deg(t.rotate_deg))
            .mul(&Self::scale(t.scale_x, t.scale_y))
    }

    /// Matrix product `self × rhs` (apply `rhs` first, then `self`).
    #[must_use]
    pub fn mul(&self, rhs: &Self) -> Self {
        Self {
            a: self.a * rhs.a + self.c * rhs.b,
            b: self.b * rhs.a + self.d * rhs.b,
            c: self.a * rhs.c + self.c * rhs.d,
            d: self.b * rhs.c + self.d * rhs.d,
            e: self.a * rhs.e + self.c * rhs.f + self.e,
            f: self.b * rhs.e + self.d * rhs.f + self.f,
        }
    }

    /// Inverse of this matrix. A degenerate matrix (|det| < 1e-12) returns
    /// identity instead of dividing by ~zero; a bad element must not abort a
    /// whole export.
    #[must_use]
    pub fn invert(&self) -> Self {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < DEGENERATE_DET {
            return Self::IDENTITY;
        }
        Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        }
    }

    /// Transform a point through this matrix.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }
}
