//! Local shading frames and hemisphere sampling.
//!
//! Samples are generated in a local space where the surface normal is +Y,
//! then mapped to world space with the frame built by
//! [`create_coordinate_system`]:
//!
//! ```text
//! world = x * Nb + y * N + z * Nt
//! ```

use crate::Vec3;
use std::f32::consts::PI;

/// Density of [`uniform_sample_hemisphere`] as used by the integrator.
pub const UNIFORM_HEMISPHERE_PDF: f32 = 1.0 / (2.0 * PI);

/// Build a tangent frame around a unit normal.
///
/// Returns `(nt, nb)` so that `nb`, `n`, `nt` are mutually orthogonal and unit
/// length. `n` must already be normalized; this is not checked.
///
/// The tangent is built in whichever plane keeps the denominator away from
/// zero, picked by comparing `|n.x|` and `|n.y|`.
#[inline]
pub fn create_coordinate_system(n: Vec3) -> (Vec3, Vec3) {
    let nt = if n.x.abs() > n.y.abs() {
        Vec3::new(n.z, 0.0, -n.x) / (n.x * n.x + n.z * n.z).sqrt()
    } else {
        Vec3::new(0.0, -n.z, n.y) / (n.y * n.y + n.z * n.z).sqrt()
    };
    let nb = n.cross(nt);
    (nt, nb)
}

/// Map a local-space sample (normal = +Y) into world space.
#[inline]
pub fn to_world(sample: Vec3, n: Vec3, nt: Vec3, nb: Vec3) -> Vec3 {
    sample.x * nb + sample.y * n + sample.z * nt
}

/// Direction on the +Y hemisphere from two uniform numbers in `[0, 1)`.
///
/// `r1` is used directly as cos(theta), so the local Y component of the
/// result equals `r1`; `r2` picks the azimuth.
#[inline]
pub fn uniform_sample_hemisphere(r1: f32, r2: f32) -> Vec3 {
    let sin_theta = (1.0 - r1 * r1).max(0.0).sqrt();
    let phi = 2.0 * PI * r2;
    Vec3::new(sin_theta * phi.cos(), r1, sin_theta * phi.sin())
}
