//! Render configuration.
//!
//! `RenderOptions` is immutable for the duration of a render. It derives
//! serde so hosts can keep it in whatever config format they already use;
//! missing fields fall back to [`RenderOptions::default`].

use crate::{Color, RenderError, RenderResult};
use lux_math::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Hemisphere samples gathered per diffuse hit.
pub const DEFAULT_DIFFUSE_SAMPLES: u32 = 128;

/// Largest accepted `max_depth`. Every level is a nested `cast_ray` call, so
/// deeper settings would overflow a worker thread's stack.
pub const MAX_DEPTH: u32 = 512;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Camera-to-world transform; the camera looks down its local -Z
    pub camera_to_world: Mat4,
    /// Deepest recursion level that still traces rays
    pub max_depth: u32,
    /// Color returned for misses and for rays past `max_depth`
    pub background: Color,
    /// Offset applied to secondary ray origins to avoid self-intersection
    pub bias: f32,
    /// Hemisphere samples per diffuse hit
    pub diffuse_samples: u32,
    /// Seed for the random sources of a render
    pub seed: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fov: 90.0,
            camera_to_world: Mat4::IDENTITY,
            max_depth: 1,
            background: Color::ZERO,
            bias: 1e-4,
            diffuse_samples: DEFAULT_DIFFUSE_SAMPLES,
            seed: 0,
        }
    }
}

impl RenderOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the field of view in degrees.
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    /// Set the camera-to-world transform directly.
    pub fn with_camera(mut self, camera_to_world: Mat4) -> Self {
        self.camera_to_world = camera_to_world;
        self
    }

    /// Place the camera at `look_from`, looking at `look_at`.
    pub fn looking_at(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.camera_to_world = Mat4::look_at_rh(look_from, look_at, vup).inverse();
        self
    }

    /// Set the maximum recursion depth.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set the secondary ray offset.
    pub fn with_bias(mut self, bias: f32) -> Self {
        self.bias = bias;
        self
    }

    /// Set the number of hemisphere samples per diffuse hit.
    pub fn with_diffuse_samples(mut self, samples: u32) -> Self {
        self.diffuse_samples = samples;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of pixels in the output image.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Image aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Check the options before any work is done.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidOptions(format!(
                "resolution {}x{} has no pixels",
                self.width, self.height
            )));
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(RenderError::InvalidOptions(format!(
                "field of view {} is outside (0, 180) degrees",
                self.fov
            )));
        }
        if !self.bias.is_finite() || self.bias < 0.0 {
            return Err(RenderError::InvalidOptions(format!(
                "bias {} must be finite and >= 0",
                self.bias
            )));
        }
        if self.diffuse_samples == 0 {
            return Err(RenderError::InvalidOptions("diffuse_samples must be at least 1".into()));
        }
        if self.max_depth > MAX_DEPTH {
            return Err(RenderError::InvalidOptions(format!(
                "max_depth {} exceeds the limit of {}",
                self.max_depth, MAX_DEPTH
            )));
        }
        if !self.camera_to_world.is_finite() {
            return Err(RenderError::InvalidOptions("camera_to_world is not finite".into()));
        }

        if self.diffuse_samples > 1 && self.max_depth >= 3 {
            log::warn!(
                "max_depth {} with {} diffuse samples grows as samples^depth, \
                 expect very long renders",
                self.max_depth,
                self.diffuse_samples
            );
        }

        Ok(())
    }
}
