//! Pinhole camera for primary ray generation.

use crate::RenderOptions;
use lux_math::{Mat4, Mat4Ext, Ray, Vec3};

/// Camera for generating primary rays through pixel centers.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    camera_to_world: Mat4,

    // Cached values
    origin: Vec3,
    scale: f32,
    aspect_ratio: f32,
}

impl Camera {
    /// Build the camera described by `options`.
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            image_width: options.width,
            image_height: options.height,
            camera_to_world: options.camera_to_world,
            origin: options.camera_to_world.origin(),
            scale: (options.fov * 0.5).to_radians().tan(),
            aspect_ratio: options.aspect_ratio(),
        }
    }

    /// World-space eye position.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Generate the ray through the center of pixel (i, j).
    ///
    /// Row 0 is the top of the image.
    pub fn get_ray(&self, i: u32, j: u32) -> Ray {
        let x = (2.0 * (i as f32 + 0.5) / self.image_width as f32 - 1.0)
            * self.aspect_ratio
            * self.scale;
        let y = (1.0 - 2.0 * (j as f32 + 0.5) / self.image_height as f32) * self.scale;

        let direction = self
            .camera_to_world
            .transform_direction(Vec3::new(x, y, -1.0))
            .normalize();

        Ray::new(self.origin, direction)
    }
}
