//! Surface materials.
//!
//! A material is a capability set rather than a single kind: a surface may be
//! diffuse, specular and transparent at the same time, and the integrator adds
//! up the contribution of every aspect that is switched on. Only
//! `self_luminous` short-circuits the others.

use lux_math::Vec3;
use serde::{Deserialize, Serialize};

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Read-only reflectance description of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Surface emits light; no further bounces are traced from it
    pub self_luminous: bool,
    /// Indirect light is gathered over the hemisphere
    pub diffuse: bool,
    /// A single mirror bounce is traced
    pub specular: bool,
    /// Reflection and refraction rays are traced and mixed by `kr`
    pub transparent: bool,

    /// Emissive intensity
    pub ka: Color,
    /// Diffuse albedo
    pub kd: Color,
    /// Specular coefficient
    pub ks: Color,
    /// Specular exponent
    pub shininess: f32,
    /// Reflection weight of the transparent mix (refraction gets `1 - kr`),
    /// clamped to [0, 1] when traced
    pub kr: f32,
    /// Index of refraction of the medium behind the surface
    pub ior: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            self_luminous: false,
            diffuse: false,
            specular: false,
            transparent: false,
            ka: Color::ZERO,
            kd: Color::ZERO,
            ks: Color::ZERO,
            shininess: 1.0,
            kr: 0.0,
            ior: 1.0,
        }
    }
}

impl Material {
    /// A surface with no aspects; hits on it return the background color.
    pub fn new() -> Self {
        Self::default()
    }

    /// A light source.
    pub fn emissive(ka: Color) -> Self {
        Self::new().with_emission(ka)
    }

    /// A purely diffuse surface.
    pub fn lambertian(kd: Color) -> Self {
        Self::new().with_diffuse(kd)
    }

    /// A mirror-like surface.
    pub fn mirror(ks: Color, shininess: f32) -> Self {
        Self::new().with_specular(ks, shininess)
    }

    /// A transparent surface such as glass.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    /// - `kr`: Share of reflected light, the rest is transmitted
    pub fn glass(ior: f32, kr: f32) -> Self {
        Self::new().with_transparency(ior, kr)
    }

    /// Turn on emission.
    pub fn with_emission(mut self, ka: Color) -> Self {
        self.self_luminous = true;
        self.ka = ka;
        self
    }

    /// Turn on the diffuse aspect.
    pub fn with_diffuse(mut self, kd: Color) -> Self {
        self.diffuse = true;
        self.kd = kd;
        self
    }

    /// Turn on the specular aspect.
    pub fn with_specular(mut self, ks: Color, shininess: f32) -> Self {
        self.specular = true;
        self.ks = ks;
        self.shininess = shininess;
        self
    }

    /// Turn on the transparent aspect.
    pub fn with_transparency(mut self, ior: f32, kr: f32) -> Self {
        self.transparent = true;
        self.ior = ior;
        self.kr = kr;
        self
    }

    /// True if a hit on this material spawns secondary rays.
    pub fn is_scattering(&self) -> bool {
        !self.self_luminous && (self.diffuse || self.specular || self.transparent)
    }
}
