//! Mirror reflection and Snell's-law refraction.

use crate::Vec3;

/// Reflect `i` about the unit normal `n`.
#[inline]
pub fn reflect(i: Vec3, n: Vec3) -> Vec3 {
    i - 2.0 * i.dot(n) * n
}

/// Refract `i` through a surface with outward normal `n`.
///
/// `ior` is the index of the medium behind the surface; the other side is
/// assumed to be air (1.0). Rays leaving the medium (`i . n > 0`) swap the two
/// indices and flip the normal.
///
/// Returns [`Vec3::ZERO`] on total internal reflection. The result is not
/// normalized.
#[inline]
pub fn refract(i: Vec3, n: Vec3, ior: f32) -> Vec3 {
    let mut cosi = i.dot(n).clamp(-1.0, 1.0);
    let (mut etai, mut etat) = (1.0, ior);
    let mut normal = n;
    if cosi < 0.0 {
        cosi = -cosi;
    } else {
        std::mem::swap(&mut etai, &mut etat);
        normal = -n;
    }

    let eta = etai / etat;
    let k = 1.0 - eta * eta * (1.0 - cosi * cosi);
    if k < 0.0 {
        Vec3::ZERO
    } else {
        eta * i + (eta * cosi - k.sqrt()) * normal
    }
}
