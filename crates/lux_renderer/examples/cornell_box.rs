//! Cornell box example.
//!
//! Renders a small box with a glass and a mirror sphere in parallel and saves
//! it in PPM format.

use anyhow::Result;
use lux_renderer::{
    color_to_rgba, render_parallel, CancelToken, Color, HittableList, ImageBuffer, Material,
    RenderOptions, Sphere, TriangleMesh, Vec3,
};
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let start = std::time::Instant::now();
    let world = build_scene();
    log::info!("Scene built with {} objects in {:?}", world.len(), start.elapsed());

    // Two diffuse bounces at 32 samples is already ~1000 rays per pixel
    let options = RenderOptions::new()
        .with_resolution(160, 160)
        .with_fov(40.0)
        .looking_at(Vec3::new(0.0, 1.0, 3.8), Vec3::new(0.0, 1.0, 0.0), Vec3::Y)
        .with_max_depth(2)
        .with_diffuse_samples(32)
        .with_seed(2024);

    let image = render_parallel(&options, &world, &CancelToken::new())?;

    let filename = "cornell_box.ppm";
    save_ppm(&image, filename)?;
    log::info!("Saved to {}", filename);
    Ok(())
}

fn build_scene() -> HittableList {
    let white = Material::lambertian(Color::splat(0.73));
    let red = Material::lambertian(Color::new(0.65, 0.05, 0.05));
    let green = Material::lambertian(Color::new(0.12, 0.45, 0.15));

    let mut world = HittableList::new();

    // Each wall is (corner, edge u, edge v, material); the normal is u x v
    let walls = [
        // Floor, ceiling, back wall
        (Vec3::new(-1.0, 0.0, 1.0), Vec3::X, Vec3::NEG_Z, white),
        (Vec3::new(-1.0, 2.0, -1.0), Vec3::X, Vec3::Z, white),
        (Vec3::new(-1.0, 0.0, -1.0), Vec3::X, Vec3::Y, white),
        // Side walls
        (Vec3::new(-1.0, 0.0, 1.0), Vec3::NEG_Z, Vec3::Y, red),
        (Vec3::new(1.0, 0.0, -1.0), Vec3::Z, Vec3::Y, green),
    ];
    for (corner, u, v, material) in walls {
        world.add(Box::new(TriangleMesh::quad(corner, u * 2.0, v * 2.0, material)));
    }

    // Ceiling light
    world.add(Box::new(TriangleMesh::quad(
        Vec3::new(-0.3, 1.99, -0.3),
        Vec3::X * 0.6,
        Vec3::Z * 0.6,
        Material::emissive(Color::splat(12.0)),
    )));

    world.add(Box::new(Sphere::new(Vec3::new(-0.45, 0.35, -0.3), 0.35, Material::glass(1.5, 0.1))));
    world.add(Box::new(Sphere::new(
        Vec3::new(0.45, 0.35, 0.2),
        0.35,
        Material::mirror(Color::splat(0.9), 1.0).with_diffuse(Color::splat(0.05)),
    )));

    world
}

fn save_ppm(image: &ImageBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let rgba = color_to_rgba(image.get(x, y));
            writeln!(writer, "{} {} {}", rgba[0], rgba[1], rgba[2])?;
        }
    }

    Ok(())
}
