//! Lux Renderer - CPU Path Tracing
//!
//! A recursive Monte Carlo path tracer. Each primary ray is followed through
//! diffuse, specular and transmitted bounces until it reaches a light, leaves
//! the scene or runs past the configured depth.

mod bucket;
mod camera;
mod error;
mod hittable;
mod integrator;
mod material;
mod mesh;
mod options;
mod renderer;
mod sphere;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use hittable::{
    HitRecord, Hittable, HittableList, Intersection, PrimitiveHit, Scene, SurfaceProperties,
};
pub use integrator::{CancelToken, Integrator, RenderStats};
pub use material::{Color, Material};
pub use mesh::TriangleMesh;
pub use options::{RenderOptions, DEFAULT_DIFFUSE_SAMPLES, MAX_DEPTH};
pub use renderer::{
    color_to_rgba, linear_to_gamma, render, render_image, render_parallel, render_pixel,
    render_with_cancel, ImageBuffer,
};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from lux_math
pub use lux_math::{Interval, Mat4, Ray, Vec2, Vec3};
