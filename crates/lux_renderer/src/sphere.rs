//! Sphere primitive for ray tracing.

use crate::{
    hittable::{Hittable, PrimitiveHit, SurfaceProperties},
    Color, Material,
};
use lux_math::{Interval, Ray, Vec2, Vec3};
use std::f32::consts::PI;

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    color: Color,
    material: Material,
}

impl Sphere {
    /// Create a new white sphere.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            color: Color::ONE,
            material,
        }
    }

    /// Set the base color of the surface.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> Vec2 {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        Vec2::new(phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<PrimitiveHit> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(PrimitiveHit {
            t: root,
            index: 0,
            uv: Self::get_sphere_uv(outward_normal),
        })
    }

    fn surface_properties(
        &self,
        point: Vec3,
        _direction: Vec3,
        _index: usize,
        uv: Vec2,
    ) -> Option<SurfaceProperties<'_>> {
        if self.radius == 0.0 {
            return None;
        }

        Some(SurfaceProperties {
            normal: (point - self.center) / self.radius,
            tex_coords: uv,
            color: self.color,
            material: Some(&self.material),
        })
    }
}
