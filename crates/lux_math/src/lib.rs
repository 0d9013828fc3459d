// Re-export glam for convenience
pub use glam::*;

// Lux math types
mod interval;
mod ray;
mod transform;

pub mod optics;
pub mod sampling;

pub use interval::Interval;
pub use optics::{reflect, refract};
pub use ray::Ray;
pub use sampling::{
    create_coordinate_system, to_world, uniform_sample_hemisphere, UNIFORM_HEMISPHERE_PDF,
};
pub use transform::Mat4Ext;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_cross_is_right_handed() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::Z), Vec3::X);
    }
}
