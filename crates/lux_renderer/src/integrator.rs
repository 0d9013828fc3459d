//! Recursive radiance estimator.
//!
//! `cast_ray` follows one ray into the scene and, depending on the material
//! that was hit, spawns:
//! - one ray per hemisphere sample for diffuse surfaces,
//! - one mirror ray for specular surfaces,
//! - one reflection and one refraction ray for transparent surfaces.
//!
//! Every aspect a material has contributes additively, starting from the
//! background color. Emissive surfaces end the path.
//!
//! Diffuse hits fan out `diffuse_samples` rays per level, so the cost of a
//! path grows as `diffuse_samples ^ max_depth`.

use crate::{Color, HitRecord, RenderError, RenderOptions, RenderResult, Scene};
use lux_math::{
    create_coordinate_system, reflect, refract, to_world, uniform_sample_hemisphere, Interval, Ray,
    UNIFORM_HEMISPHERE_PDF,
};
use rand::{Rng, RngCore};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Shared flag used to stop a render early.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every render holding this token to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once the token has fired.
    #[inline]
    pub fn check(&self) -> RenderResult<()> {
        if self.is_cancelled() {
            Err(RenderError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Counters collected while rendering.
#[derive(Debug, Default)]
pub struct RenderStats {
    rays: AtomicU64,
}

impl RenderStats {
    /// Rays that were tested against the scene.
    pub fn rays(&self) -> u64 {
        self.rays.load(Ordering::Relaxed)
    }

    #[inline]
    fn record_ray(&self) {
        self.rays.fetch_add(1, Ordering::Relaxed);
    }
}

/// Generate a uniform f32 in [0, 1).
#[inline]
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Path integrator bound to one scene and one set of options.
///
/// Holds no random state; callers pass their own source so several workers
/// can share one integrator.
pub struct Integrator<'a> {
    scene: &'a dyn Scene,
    options: &'a RenderOptions,
    cancel: CancelToken,
    stats: RenderStats,
}

impl<'a> Integrator<'a> {
    pub fn new(scene: &'a dyn Scene, options: &'a RenderOptions) -> Self {
        Self {
            scene,
            options,
            cancel: CancelToken::new(),
            stats: RenderStats::default(),
        }
    }

    /// Stop with [`RenderError::Cancelled`] once `cancel` fires.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        self.options
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Compute the radiance arriving along `ray`.
    ///
    /// `depth` is 0 for primary rays. Past `max_depth` the background is
    /// returned without touching the scene.
    pub fn cast_ray(&self, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> RenderResult<Color> {
        self.cancel.check()?;

        let background = self.options.background;
        if depth > self.options.max_depth {
            return Ok(background);
        }

        self.stats.record_ray();
        let Some(intersection) = self.scene.intersect(ray, Interval::POSITIVE) else {
            return Ok(background);
        };
        let hit = intersection.resolve(ray)?;
        let material = hit.material;

        // Lights end the path
        if material.self_luminous {
            return Ok(material.ka * hit.color);
        }

        let mut hit_color = background;

        if material.diffuse {
            hit_color += self.indirect_diffuse(&hit, depth, rng)? * material.kd;
        }

        if material.specular {
            hit_color += self.specular(ray, &hit, depth, rng)?;
        }

        if material.transparent {
            hit_color += self.transmission(ray, &hit, depth, rng)?;
        }

        Ok(hit_color)
    }

    /// Monte Carlo estimate of the light arriving over the hemisphere.
    fn indirect_diffuse(
        &self,
        hit: &HitRecord,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> RenderResult<Color> {
        let n = hit.facing_normal();
        let (nt, nb) = create_coordinate_system(n);
        let origin = hit.point + n * self.options.bias;
        let samples = self.options.diffuse_samples;

        let mut indirect = Color::ZERO;
        for _ in 0..samples {
            let r1 = gen_f32(rng);
            let r2 = gen_f32(rng);
            let direction = to_world(uniform_sample_hemisphere(r1, r2), n, nt, nb);

            // r1 is cos(theta) of the sample
            let incoming = self.cast_ray(&Ray::new(origin, direction), depth + 1, rng)?;
            indirect += r1 * incoming / UNIFORM_HEMISPHERE_PDF;
        }

        Ok(indirect / samples as f32)
    }

    /// Single mirror bounce weighted by a Phong-style lobe.
    fn specular(
        &self,
        ray: &Ray,
        hit: &HitRecord,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> RenderResult<Color> {
        let material = hit.material;
        let direction = ray.direction();
        let reflected = reflect(direction, hit.normal).normalize();

        let origin = hit.point + hit.facing_normal() * self.options.bias;
        let incoming = self.cast_ray(&Ray::new(origin, reflected), depth + 1, rng)?;

        let cos_alpha = reflected.dot(-direction).max(0.0);
        Ok(incoming * material.ks * cos_alpha.powf(material.shininess))
    }

    /// Reflection and refraction mixed by the material's `kr`.
    fn transmission(
        &self,
        ray: &Ray,
        hit: &HitRecord,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> RenderResult<Color> {
        let material = hit.material;
        let direction = ray.direction();
        let kr = material.kr.clamp(0.0, 1.0);
        let offset = hit.facing_normal() * self.options.bias;

        // Total internal reflection leaves nothing to transmit
        let refraction_color = match refract(direction, hit.normal, material.ior).try_normalize() {
            Some(refracted) => {
                self.cast_ray(&Ray::new(hit.point - offset, refracted), depth + 1, rng)?
            }
            None => Color::ZERO,
        };

        let reflected = reflect(direction, hit.normal).normalize();
        let reflection_color =
            self.cast_ray(&Ray::new(hit.point + offset, reflected), depth + 1, rng)?;

        Ok(reflection_color * kr + refraction_color * (1.0 - kr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HittableList, Material, Sphere, Triangle};
    use lux_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn close(a: Color, b: Color, eps: f32) -> bool {
        (a - b).abs().max_element() < eps
    }

    /// Big triangle at z = -5 facing the origin.
    fn wall(material: Material) -> Triangle {
        Triangle::new(
            Vec3::new(-100.0, -100.0, -5.0),
            Vec3::new(100.0, -100.0, -5.0),
            Vec3::new(0.0, 100.0, -5.0),
            material,
        )
    }

    #[test]
    fn test_depth_limit_returns_background() {
        let world = HittableList::new().with(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Material::emissive(Color::ONE),
        ));
        let options = RenderOptions::new()
            .with_max_depth(2)
            .with_background(Color::new(0.1, 0.2, 0.3));
        let integrator = Integrator::new(&world, &options);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let color = integrator.cast_ray(&ray, options.max_depth + 1, &mut rng()).unwrap();

        assert_eq!(color, options.background);
        assert_eq!(integrator.stats().rays(), 0);
    }

    #[test]
    fn test_miss_returns_background() {
        let world = HittableList::new();
        let options = RenderOptions::new().with_background(Color::splat(0.7));
        let integrator = Integrator::new(&world, &options);

        for dir in [Vec3::X, Vec3::NEG_Y, Vec3::new(0.3, 0.4, -0.5).normalize()] {
            let color = integrator.cast_ray(&Ray::new(Vec3::ZERO, dir), 0, &mut rng()).unwrap();
            assert_eq!(color, Color::splat(0.7));
        }
    }

    #[test]
    fn test_emissive_short_circuits() {
        // Emission wins over every other aspect and spawns no rays
        let light = Material::emissive(Color::new(2.0, 1.0, 0.5))
            .with_diffuse(Color::ONE)
            .with_specular(Color::ONE, 10.0)
            .with_transparency(1.5, 0.5);
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, light);
        let world = HittableList::new().with(sphere.with_color(Color::new(0.5, 0.5, 1.0)));
        let options = RenderOptions::new().with_max_depth(4);
        let integrator = Integrator::new(&world, &options);

        let color = integrator.cast_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), 0, &mut rng()).unwrap();

        assert_eq!(color, Color::new(1.0, 0.5, 0.5));
        assert_eq!(integrator.stats().rays(), 1);
    }

    #[test]
    fn test_no_aspects_returns_background() {
        let world = HittableList::new().with(wall(Material::new()));
        let options = RenderOptions::new().with_background(Color::splat(0.25));
        let integrator = Integrator::new(&world, &options);

        let color = integrator.cast_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), 0, &mut rng()).unwrap();
        assert_eq!(color, Color::splat(0.25));
        assert_eq!(integrator.stats().rays(), 1);
    }

    #[test]
    fn test_diffuse_fans_out_samples() {
        let world = HittableList::new().with(wall(Material::lambertian(Color::splat(0.5))));
        let options = RenderOptions::new().with_max_depth(1).with_diffuse_samples(16);
        let integrator = Integrator::new(&world, &options);

        integrator.cast_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), 0, &mut rng()).unwrap();

        // One primary ray plus one ray per hemisphere sample
        assert_eq!(integrator.stats().rays(), 17);
    }

    #[test]
    fn test_diffuse_under_uniform_sky() {
        // Every sample escapes to the background: E[r1 * bg / pdf] = pi * bg
        let background = Color::splat(0.1);
        let kd = Color::new(0.5, 0.25, 1.0);
        let world = HittableList::new().with(wall(Material::lambertian(kd)));
        let options = RenderOptions::new()
            .with_background(background)
            .with_diffuse_samples(4096);
        let integrator = Integrator::new(&world, &options);

        let color = integrator.cast_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), 0, &mut rng()).unwrap();
        let expected = background + kd * background * std::f32::consts::PI;

        assert!(close(color, expected, 0.02), "color={color} expected={expected}");
    }

    #[test]
    fn test_mirror_at_normal_incidence() {
        let background = Color::splat(0.2);
        let world = HittableList::new().with(wall(Material::mirror(Color::splat(0.5), 8.0)));
        let options = RenderOptions::new().with_background(background);
        let integrator = Integrator::new(&world, &options);

        // Reflected ray heads straight back and escapes; cos(alpha) = 1
        let color = integrator.cast_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), 0, &mut rng()).unwrap();
        assert!(close(color, background + background * 0.5, 1e-5), "color={color}");
        assert_eq!(integrator.stats().rays(), 2);
    }

    #[test]
    fn test_mirror_reflects_light() {
        // A light behind the camera is seen through the mirror
        let world = HittableList::new()
            .with(wall(Material::mirror(Color::ONE, 1.0)))
            .with(Sphere::new(
                Vec3::new(0.0, 0.0, 5.0),
                1.0,
                Material::emissive(Color::splat(3.0)),
            ));
        let options = RenderOptions::new();
        let integrator = Integrator::new(&world, &options);

        let color = integrator.cast_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), 0, &mut rng()).unwrap();
        assert!(close(color, Color::splat(3.0), 1e-4), "color={color}");
    }

    #[test]
    fn test_transparent_mixes_reflection_and_refraction() {
        // Light behind the pane, nothing in front: only the refracted ray sees it
        let world = HittableList::new()
            .with(wall(Material::glass(1.0, 0.25)))
            .with(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, Material::emissive(Color::ONE)));
        let options = RenderOptions::new();
        let integrator = Integrator::new(&world, &options);

        let color = integrator.cast_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), 0, &mut rng()).unwrap();
        assert!(close(color, Color::splat(0.75), 1e-5), "color={color}");
        assert_eq!(integrator.stats().rays(), 3);
    }

    #[test]
    fn test_out_of_range_kr_is_clamped() {
        // kr set directly on the field, bypassing the builder
        for (kr, expected) in [(3.0, 0.0), (-1.0, 1.0)] {
            let mut glass = Material::glass(1.0, 0.5);
            glass.kr = kr;
            let world = HittableList::new().with(wall(glass)).with(Sphere::new(
                Vec3::new(0.0, 0.0, -10.0),
                1.0,
                Material::emissive(Color::ONE),
            ));
            let options = RenderOptions::new();
            let integrator = Integrator::new(&world, &options);

            let color = integrator
                .cast_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), 0, &mut rng())
                .unwrap();
            assert!(close(color, Color::splat(expected), 1e-5), "kr={kr} color={color}");
        }
    }

    #[test]
    fn test_total_internal_reflection_skips_refraction() {
        // Start inside glass and leave at a grazing angle
        let world =
            HittableList::new().with(Sphere::new(Vec3::ZERO, 10.0, Material::glass(1.5, 0.4)));
        let background = Color::splat(1.0);
        let options = RenderOptions::new().with_max_depth(0).with_background(background);
        let integrator = Integrator::new(&world, &options);

        let origin = Vec3::new(0.0, 9.9, 0.0);
        let ray = Ray::new(origin, Vec3::X);
        let color = integrator.cast_ray(&ray, 0, &mut rng()).unwrap();

        // Only the reflected ray is traced (and returns the background at depth 1)
        assert!(close(color, background + background * 0.4, 1e-5), "color={color}");
        assert_eq!(integrator.stats().rays(), 1);
    }

    #[test]
    fn test_aspects_add_up() {
        let background = Color::splat(0.1);
        let material =
            Material::lambertian(Color::splat(0.5)).with_specular(Color::splat(0.5), 1.0);
        let world = HittableList::new().with(wall(material));
        let options = RenderOptions::new().with_background(background).with_diffuse_samples(8);
        let integrator = Integrator::new(&world, &options);

        let color = integrator.cast_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), 0, &mut rng()).unwrap();

        // background + diffuse term + mirror term, each strictly positive
        assert!(color.min_element() > (background + background * 0.5).max_element());
        assert_eq!(integrator.stats().rays(), 1 + 8 + 1);
    }

    #[test]
    fn test_cancelled_token_stops_tracing() {
        let world = HittableList::new();
        let options = RenderOptions::new();
        let cancel = CancelToken::new();
        let integrator = Integrator::new(&world, &options).with_cancel(cancel.clone());

        assert!(integrator.cast_ray(&Ray::default(), 0, &mut rng()).is_ok());
        cancel.cancel();
        assert_eq!(
            integrator.cast_ray(&Ray::default(), 0, &mut rng()),
            Err(RenderError::Cancelled)
        );
    }

    #[test]
    fn test_same_seed_same_estimate() {
        let world = HittableList::new()
            .with(wall(Material::lambertian(Color::splat(0.8))))
            .with(Sphere::new(Vec3::new(0.0, 3.0, -3.0), 1.0, Material::emissive(Color::ONE)));
        let options = RenderOptions::new().with_diffuse_samples(32);
        let integrator = Integrator::new(&world, &options);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let a = integrator.cast_ray(&ray, 0, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = integrator.cast_ray(&ray, 0, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }
}
