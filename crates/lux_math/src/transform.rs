// Transform utilities for Mat4
//
// The camera-to-world matrix moves points (the eye) and directions (primary
// rays) differently: directions must ignore the translation column.

use glam::{Mat4, Vec3, Vec4};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform a vector in 3D space (applies rotation and scale, but NOT translation).
    /// Vectors have an implicit w=0 component.
    fn transform_direction(&self, vector: Vec3) -> Vec3;

    /// The translation column, i.e. where the local origin lands in world space.
    fn origin(&self) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn transform_direction(&self, vector: Vec3) -> Vec3 {
        let v4 = Vec4::new(vector.x, vector.y, vector.z, 0.0);
        let transformed = *self * v4;
        Vec3::new(transformed.x, transformed.y, transformed.z)
    }

    fn origin(&self) -> Vec3 {
        self.transform_point3(Vec3::ZERO)
    }
}
