//! Simple path tracer example.
//!
//! Plays the host application: builds a scene, owns the camera, splits rows
//! across threads with rayon and streams a plain PPM image to stdout.
//!
//! ```text
//! RUST_LOG=info cargo run --release --example simple_render > output.ppm
//! ```

use glint_renderer::{
    gen_f32, random_in_unit_disk, render_pixel, write_pixels, Color, Dielectric, HittableList,
    Lambertian, Material, Metal, Ray, RenderConfig, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;
use std::io::{BufWriter, Write};
use std::sync::Arc;

const IMAGE_WIDTH: u32 = 400;
const IMAGE_HEIGHT: u32 = 225;
const SCENE_SEED: u64 = 2024;

/// Pinhole camera with an optional thin-lens defocus disk.
struct Camera {
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    defocus_angle: f32,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    fn new(
        width: u32,
        height: u32,
        look_from: Vec3,
        look_at: Vec3,
        vfov: f32,
        defocus_angle: f32,
        focus_dist: f32,
    ) -> Self {
        let h = (vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h * focus_dist;
        let viewport_width = viewport_height * (width as f32 / height as f32);

        let w = (look_from - look_at).normalize();
        let u = Vec3::Y.cross(w).normalize();
        let v = w.cross(u);

        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;
        let pixel_delta_u = viewport_u / width as f32;
        let pixel_delta_v = viewport_v / height as f32;

        let viewport_upper_left = look_from - focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let defocus_radius = focus_dist * (defocus_angle / 2.0).to_radians().tan();

        Self {
            center: look_from,
            pixel00_loc: viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v),
            pixel_delta_u,
            pixel_delta_v,
            defocus_angle,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
        }
    }

    /// Jittered ray through pixel (i, j).
    fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let (dx, dy) = (gen_f32(rng) - 0.5, gen_f32(rng) - 0.5);
        let pixel_sample = self.pixel00_loc
            + (i as f32 + dx) * self.pixel_delta_u
            + (j as f32 + dy) * self.pixel_delta_v;

        let origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            let p = random_in_unit_disk(rng);
            self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
        };

        Ray::new(origin, pixel_sample - origin)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let start = std::time::Instant::now();
    let world = build_scene();
    log::info!("Scene built with {} objects in {:?}", world.len(), start.elapsed());

    let camera = Camera::new(
        IMAGE_WIDTH,
        IMAGE_HEIGHT,
        Vec3::new(13.0, 2.0, 3.0),
        Vec3::ZERO,
        20.0,
        0.6,
        10.0,
    );

    let config = RenderConfig::default().with_quality(32, 10).with_sky_gradient();
    config.validate()?;

    log::info!(
        "Rendering {}x{} @ {} spp...",
        IMAGE_WIDTH,
        IMAGE_HEIGHT,
        config.samples_per_pixel
    );
    let start = std::time::Instant::now();

    // Each row owns its RNG, seeded by row index, so output is reproducible
    let rows: Vec<Vec<Color>> = (0..IMAGE_HEIGHT)
        .into_par_iter()
        .map(|j| {
            let mut rng = StdRng::seed_from_u64(j as u64);
            (0..IMAGE_WIDTH)
                .map(|i| render_pixel(|rng| camera.get_ray(i, j, rng), &world, &config, &mut rng))
                .collect()
        })
        .collect();

    log::info!("Rendered in {:?}", start.elapsed());

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(out, "P3")?;
    writeln!(out, "{} {}", IMAGE_WIDTH, IMAGE_HEIGHT)?;
    writeln!(out, "255")?;
    for row in &rows {
        write_pixels(&mut out, row, config.encoding)?;
    }
    out.flush()?;

    Ok(())
}

fn build_scene() -> HittableList {
    let mut world = HittableList::new();
    let mut rng = StdRng::seed_from_u64(SCENE_SEED);

    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
    world.add(Box::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground)));

    // One glass material shared by every glass sphere
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));

    for a in -5..5 {
        for b in -5..5 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                );
                Arc::new(Metal::new(albedo, rng.gen_range(0.0..0.5)))
            } else {
                Arc::clone(&glass)
            };
            world.add(Box::new(Sphere::new(center, 0.2, material)));
        }
    }

    world.add(Box::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass)));
    world.add(Box::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    world
}
