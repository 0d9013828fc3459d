//! Frame rendering.
//!
//! - `render` walks the pixels row-major on the calling thread
//! - `render_parallel` splits the frame into buckets and renders them on the
//!   rayon pool
//!
//! Both validate the options first and write every pixel exactly once.

use crate::bucket::{generate_buckets, render_bucket, DEFAULT_BUCKET_SIZE};
use crate::{
    Camera, CancelToken, Color, Integrator, RenderError, RenderOptions, RenderResult, Scene,
};
use lux_math::Interval;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;

/// Trace the primary ray of pixel (x, y).
#[inline]
pub fn render_pixel(
    camera: &Camera,
    integrator: &Integrator,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> RenderResult<Color> {
    let ray = camera.get_ray(x, y);
    integrator.cast_ray(&ray, 0, rng)
}

/// Render the scene into a caller-owned, row-major buffer of
/// `width * height` pixels.
pub fn render(
    options: &RenderOptions,
    scene: &dyn Scene,
    pixels: &mut [Color],
) -> RenderResult<()> {
    render_with_cancel(options, scene, pixels, &CancelToken::new())
}

/// [`render`] that stops with [`RenderError::Cancelled`] once `cancel` fires.
pub fn render_with_cancel(
    options: &RenderOptions,
    scene: &dyn Scene,
    pixels: &mut [Color],
    cancel: &CancelToken,
) -> RenderResult<()> {
    options.validate()?;
    if pixels.len() != options.pixel_count() {
        return Err(RenderError::BufferSize {
            expected: options.pixel_count(),
            actual: pixels.len(),
        });
    }

    log::info!(
        "Rendering {}x{}, max depth {}, {} diffuse samples",
        options.width,
        options.height,
        options.max_depth,
        options.diffuse_samples
    );
    let start = Instant::now();

    let camera = Camera::new(options);
    let integrator = Integrator::new(scene, options).with_cancel(cancel.clone());
    let mut rng = StdRng::seed_from_u64(options.seed);

    let width = options.width as usize;
    for (j, row) in pixels.chunks_exact_mut(width).enumerate() {
        for (i, pixel) in row.iter_mut().enumerate() {
            cancel.check()?;
            *pixel = render_pixel(&camera, &integrator, i as u32, j as u32, &mut rng)?;
        }
    }

    log::info!(
        "Rendered in {:?} ({} rays)",
        start.elapsed(),
        integrator.stats().rays()
    );
    Ok(())
}

/// Render the whole frame into a new image buffer.
pub fn render_image(options: &RenderOptions, scene: &dyn Scene) -> RenderResult<ImageBuffer> {
    let mut image = ImageBuffer::new(options.width, options.height);
    render(options, scene, &mut image.pixels)?;
    Ok(image)
}

/// Render the frame bucket by bucket on the rayon thread pool.
///
/// Each bucket seeds its own random source from `options.seed` and its
/// position, so the image does not depend on how buckets are scheduled.
pub fn render_parallel(
    options: &RenderOptions,
    scene: &dyn Scene,
    cancel: &CancelToken,
) -> RenderResult<ImageBuffer> {
    options.validate()?;

    let buckets = generate_buckets(options.width, options.height, DEFAULT_BUCKET_SIZE);
    log::info!(
        "Rendering {}x{} in {} buckets on {} threads",
        options.width,
        options.height,
        buckets.len(),
        rayon::current_num_threads()
    );
    let start = Instant::now();

    let camera = Camera::new(options);
    let integrator = Integrator::new(scene, options).with_cancel(cancel.clone());

    let results = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, &camera, &integrator))
        .collect::<RenderResult<Vec<_>>>()?;

    let mut image = ImageBuffer::new(options.width, options.height);
    for result in results {
        let bucket = result.bucket;
        for (k, color) in result.pixels.into_iter().enumerate() {
            let k = k as u32;
            image.set(bucket.x + k % bucket.width, bucket.y + k / bucket.width, color);
        }
    }

    log::info!(
        "Rendered in {:?} ({} rays)",
        start.elapsed(),
        integrator.stats().rays()
    );
    Ok(image)
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let to_byte = |c: f32| (255.0 * Interval::UNIT.clamp(linear_to_gamma(c))) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}

/// Row-major pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&color| color_to_rgba(color)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HittableList, Material, Sphere};
    use lux_math::Vec3;

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgba_clamps() {
        assert_eq!(color_to_rgba(Color::new(4.0, -1.0, 0.25)), [255, 0, 127, 255]);
    }

    #[test]
    fn test_image_buffer_is_row_major() {
        let mut image = ImageBuffer::new(3, 2);
        image.set(2, 1, Color::ONE);

        assert_eq!(image.pixels[5], Color::ONE);
        assert_eq!(image.get(2, 1), Color::ONE);
        assert_eq!(image.to_rgba().len(), 3 * 2 * 4);
    }

    #[test]
    fn test_buffer_size_mismatch_fails() {
        let options = RenderOptions::new().with_resolution(4, 4);
        let mut pixels = vec![Color::ZERO; 15];

        let err = render(&options, &HittableList::new(), &mut pixels).unwrap_err();
        assert_eq!(err, RenderError::BufferSize { expected: 16, actual: 15 });
    }

    #[test]
    fn test_invalid_options_fail_before_rendering() {
        let options = RenderOptions::new().with_resolution(0, 4);
        let mut pixels = Vec::new();

        assert!(matches!(
            render(&options, &HittableList::new(), &mut pixels),
            Err(RenderError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_excessive_depth_fails_before_tracing() {
        // Inside a glass sphere every level recurses, so this must never reach cast_ray
        let world = HittableList::new().with(Sphere::new(
            Vec3::ZERO,
            2.0,
            Material::glass(1.5, 0.1),
        ));
        let options = RenderOptions::new()
            .with_resolution(1, 1)
            .with_max_depth(crate::MAX_DEPTH * 10);
        let mut pixels = vec![Color::ZERO; 1];

        assert!(matches!(
            render(&options, &world, &mut pixels),
            Err(RenderError::InvalidOptions(_))
        ));
        assert!(matches!(
            render_parallel(&options, &world, &CancelToken::new()),
            Err(RenderError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_render_writes_every_pixel() {
        let options = RenderOptions::new()
            .with_resolution(5, 3)
            .with_background(Color::splat(0.5));
        let mut pixels = vec![Color::splat(-1.0); 15];

        render(&options, &HittableList::new(), &mut pixels).unwrap();
        assert!(pixels.iter().all(|&p| p == Color::splat(0.5)));
    }

    #[test]
    fn test_render_pixel_hits_center() {
        let world = HittableList::new().with(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            0.5,
            Material::emissive(Color::ONE),
        ));
        let options = RenderOptions::new().with_resolution(9, 9);
        let camera = Camera::new(&options);
        let integrator = Integrator::new(&world, &options);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(render_pixel(&camera, &integrator, 4, 4, &mut rng).unwrap(), Color::ONE);
        assert_eq!(render_pixel(&camera, &integrator, 0, 0, &mut rng).unwrap(), Color::ZERO);
    }

    #[test]
    fn test_cancel_before_render() {
        let options = RenderOptions::new().with_resolution(2, 2);
        let mut pixels = vec![Color::ZERO; 4];
        let cancel = CancelToken::new();
        cancel.cancel();

        assert_eq!(
            render_with_cancel(&options, &HittableList::new(), &mut pixels, &cancel),
            Err(RenderError::Cancelled)
        );
        assert_eq!(
            render_parallel(&options, &HittableList::new(), &cancel).unwrap_err(),
            RenderError::Cancelled
        );
    }
}
