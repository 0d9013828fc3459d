//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{
    hittable::{Hittable, PrimitiveHit, SurfaceProperties},
    Color, Material,
};
use lux_math::{Interval, Ray, Vec2, Vec3};

/// Möller-Trumbore ray-triangle intersection.
///
/// Returns `(t, u, v)` where `u`, `v` are the barycentric weights of `v1` and
/// `v2`.
#[inline]
pub(crate) fn intersect_triangle(
    ray: &Ray,
    ray_t: Interval,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<(f32, f32, f32)> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction().cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < 1e-8 {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin() - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction().dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    ray_t.surrounds(t).then_some((t, u, v))
}

/// A single flat-shaded triangle.
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    color: Color,
    material: Material,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// The normal follows the counter-clockwise winding `v0 -> v1 -> v2`.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Material) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self {
            v0,
            v1,
            v2,
            normal,
            color: Color::ONE,
            material,
        }
    }

    /// Set the base color of the surface.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Hittable for Triangle {
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<PrimitiveHit> {
        let (t, u, v) = intersect_triangle(ray, ray_t, self.v0, self.v1, self.v2)?;
        Some(PrimitiveHit {
            t,
            index: 0,
            uv: Vec2::new(u, v),
        })
    }

    fn surface_properties(
        &self,
        _point: Vec3,
        _direction: Vec3,
        _index: usize,
        uv: Vec2,
    ) -> Option<SurfaceProperties<'_>> {
        Some(SurfaceProperties {
            normal: self.normal,
            tex_coords: uv,
            color: self.color,
            material: Some(&self.material),
        })
    }
}
