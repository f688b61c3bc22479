//! Core light transport.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a caller-supplied depth bound
//! - Per-pixel multi-sampling over caller-generated rays
//! - Gamma-encoded pixel output

use crate::color::{write_pixels, Encoding, OutputError};
use crate::{Color, Hittable};
use glint_math::{Interval, Ray};
use rand::RngCore;
use std::io::Write;
use thiserror::Error;

/// Range of ray parameters accepted as hits.
///
/// The lower bound skips self-intersections caused by floating point error
/// at the origin of a scattered ray.
pub const SEARCH_INTERVAL: Interval = Interval::new(0.001, f32::INFINITY);

/// Errors raised by an invalid [`RenderConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("samples_per_pixel must be at least 1")]
    ZeroSamples,

    #[error("background color must be finite, got {0:?}")]
    NonFiniteBackground(Color),
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Background color when ray doesn't hit anything
    pub background: Color,
    /// Whether to use sky gradient instead of solid background
    pub use_sky_gradient: bool,
    /// Transform applied before quantizing output
    pub encoding: Encoding,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Color::ZERO,
            use_sky_gradient: false,
            encoding: Encoding::Gamma,
        }
    }
}

impl RenderConfig {
    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set a solid background color. Disables the sky gradient.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self.use_sky_gradient = false;
        self
    }

    /// Use the white-to-blue sky gradient for missed rays.
    pub fn with_sky_gradient(mut self) -> Self {
        self.use_sky_gradient = true;
        self
    }

    /// Set the output encoding.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Check the configuration before a render.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if !self.background.is_finite() {
            return Err(ConfigError::NonFiniteBackground(self.background));
        }
        Ok(())
    }

    /// Radiance seen along a ray that escapes the scene.
    fn miss_color(&self, ray: &Ray) -> Color {
        if self.use_sky_gradient {
            sky_gradient(ray)
        } else {
            self.background
        }
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and multiplying in each attenuation.
/// `depth` is the number of bounces left; at zero the path contributes black.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    // Out of bounces, no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, SEARCH_INTERVAL) else {
        return config.miss_color(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            result.attenuation * ray_color(&result.scattered, world, depth - 1, config, rng)
        }
        // Absorbed
        None => Color::ZERO,
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Render a single pixel with multi-sampling.
///
/// `sample_ray` produces one jittered primary ray per call; it belongs to the
/// caller's camera. Returns the average linear radiance of the samples, or
/// black if `samples_per_pixel` is zero.
pub fn render_pixel<F>(
    mut sample_ray: F,
    world: &dyn Hittable,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color
where
    F: FnMut(&mut dyn RngCore) -> Ray,
{
    if config.samples_per_pixel == 0 {
        return Color::ZERO;
    }

    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let ray = sample_ray(rng);
        pixel_color += ray_color(&ray, world, config.max_depth, config, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}

/// Simple image buffer holding linear radiance in row-major order.
#[derive(Debug, Clone)]
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

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
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

    /// Stream every pixel as an `"r g b"` line, top row first.
    ///
    /// The PPM header is the caller's to write.
    pub fn write_pixels<W: Write>(&self, out: &mut W, encoding: Encoding) -> Result<(), OutputError> {
        write_pixels(out, &self.pixels, encoding)
    }
}

/// Render a full frame on the calling thread.
///
/// `sample_ray(x, y, rng)` returns a primary ray through pixel `(x, y)`.
/// Callers wanting parallelism split the image themselves and call
/// [`render_pixel`] with a per-task RNG.
pub fn render<F>(
    width: u32,
    height: u32,
    mut sample_ray: F,
    world: &dyn Hittable,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Result<ImageBuffer, ConfigError>
where
    F: FnMut(u32, u32, &mut dyn RngCore) -> Ray,
{
    config.validate()?;

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth
    );
    let start = std::time::Instant::now();

    let mut image = ImageBuffer::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let color = render_pixel(|rng| sample_ray(x, y, rng), world, config, rng);
            image.set(x, y, color);
        }
        log::trace!("Finished row {}/{}", y + 1, height);
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HitRecord, HittableList, Lambertian, Material, Metal, ScatterResult, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    /// Fails the test if any ray ever scatters off it.
    struct PanickingMaterial;

    impl Material for PanickingMaterial {
        fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
            panic!("material should not be invoked");
        }
    }

    /// Absorbs everything.
    struct BlackBody;

    impl Material for BlackBody {
        fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
            None
        }
    }

    fn single_sphere(material: Arc<dyn Material>) -> HittableList {
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, material)));
        world
    }

    #[test]
    fn test_sky_gradient() {
        let up_color = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::Y));
        let down_color = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::NEG_Y));

        // blue = (0.5, 0.7, 1.0), white = (1.0, 1.0, 1.0)
        assert!((up_color - Color::new(0.5, 0.7, 1.0)).length() < 1e-5);
        assert!((down_color - Color::ONE).length() < 1e-5);
    }

    #[test]
    fn test_empty_scene_returns_background() {
        let world = HittableList::new();
        let background = Color::new(0.2, 0.4, 0.6);
        let config = RenderConfig::default().with_background(background);
        let mut rng = StdRng::seed_from_u64(42);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(ray_color(&ray, &world, 10, &config, &mut rng), background);
    }

    #[test]
    fn test_miss_never_invokes_material() {
        let world = single_sphere(Arc::new(PanickingMaterial));
        let config = RenderConfig::default().with_sky_gradient();
        let mut rng = StdRng::seed_from_u64(42);

        // Pointing away from the only sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let color = ray_color(&ray, &world, 10, &config, &mut rng);
        assert!((color - Color::new(0.5, 0.7, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_zero_depth_is_black() {
        let world = single_sphere(Arc::new(PanickingMaterial));
        let config = RenderConfig::default().with_background(Color::ONE);
        let mut rng = StdRng::seed_from_u64(42);

        let hitting = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let missing = Ray::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(ray_color(&hitting, &world, 0, &config, &mut rng), Color::ZERO);
        assert_eq!(ray_color(&missing, &world, 0, &config, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_absorption_is_black() {
        let world = single_sphere(Arc::new(BlackBody));
        let config = RenderConfig::default().with_background(Color::ONE);
        let mut rng = StdRng::seed_from_u64(42);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(ray_color(&ray, &world, 10, &config, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_zero_radius_sphere_does_not_darken_background() {
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            -1.0,
            Arc::new(Lambertian::new(Color::splat(0.5))),
        )));
        let config = RenderConfig::default().with_background(Color::ONE);
        let mut rng = StdRng::seed_from_u64(42);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(ray_color(&ray, &world, 10, &config, &mut rng), Color::ONE);
    }

    #[test]
    fn test_single_bounce_multiplies_attenuation() {
        let albedo = Color::new(0.5, 0.25, 1.0);
        // Head-on mirror sends the ray straight back out to the background
        let world = single_sphere(Arc::new(Metal::new(albedo, 0.0)));
        let config = RenderConfig::default().with_background(Color::ONE);
        let mut rng = StdRng::seed_from_u64(42);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let color = ray_color(&ray, &world, 10, &config, &mut rng);
        assert!((color - albedo).length() < 1e-5);

        // With one bounce left the reflected ray hits the depth limit
        assert_eq!(ray_color(&ray, &world, 1, &config, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_facing_mirrors_terminate_at_depth_limit() {
        let mirror: Arc<dyn Material> = Arc::new(Metal::new(Color::ONE, 0.0));
        let mut world = HittableList::new();
        // Ray starts inside one giant mirrored sphere and bounces forever
        world.add(Box::new(Sphere::new(Vec3::ZERO, 10.0, mirror)));
        let config = RenderConfig::default().with_background(Color::ONE);
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ray_color(&ray, &world, 25, &config, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_render_pixel_averages_samples() {
        let world = HittableList::new();
        let background = Color::new(0.1, 0.2, 0.3);
        let config = RenderConfig::default()
            .with_quality(8, 5)
            .with_background(background);
        let mut rng = StdRng::seed_from_u64(42);

        let color = render_pixel(|_| Ray::new(Vec3::ZERO, Vec3::NEG_Z), &world, &config, &mut rng);
        assert!((color - background).length() < 1e-5);
    }

    #[test]
    fn test_render_pixel_hits_diffuse_sphere() {
        let world = single_sphere(Arc::new(Lambertian::new(Color::splat(0.5))));
        let config = RenderConfig::default()
            .with_quality(16, 5)
            .with_sky_gradient();
        let mut rng = StdRng::seed_from_u64(42);

        let color = render_pixel(|_| Ray::new(Vec3::ZERO, Vec3::NEG_Z), &world, &config, &mut rng);
        // Some light gets back out, but never more than the sky provides
        assert!(color.length() > 0.0);
        assert!(color.max_element() <= 1.0);
    }

    #[test]
    fn test_seeded_render_is_deterministic() {
        let world = single_sphere(Arc::new(Lambertian::new(Color::splat(0.5))));
        let config = RenderConfig::default().with_quality(4, 5).with_sky_gradient();
        let sample = |_: &mut dyn RngCore| Ray::new(Vec3::ZERO, Vec3::new(0.1, 0.0, -1.0));

        let a = render_pixel(sample, &world, &config, &mut StdRng::seed_from_u64(7));
        let b = render_pixel(sample, &world, &config, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_validate() {
        assert_eq!(RenderConfig::default().validate(), Ok(()));
        assert_eq!(
            RenderConfig::default().with_quality(0, 5).validate(),
            Err(ConfigError::ZeroSamples)
        );
        let bad = RenderConfig::default().with_background(Color::new(f32::NAN, 0.0, 0.0));
        assert!(matches!(bad.validate(), Err(ConfigError::NonFiniteBackground(_))));
    }

    #[test]
    fn test_render_rejects_invalid_config() {
        let world = HittableList::new();
        let config = RenderConfig::default().with_quality(0, 5);
        let mut rng = StdRng::seed_from_u64(42);

        let result = render(2, 2, |_, _, _| Ray::default(), &world, &config, &mut rng);
        assert_eq!(result.err(), Some(ConfigError::ZeroSamples));
    }

    #[test]
    fn test_render_and_stream_pixels() {
        let world = HittableList::new();
        let config = RenderConfig::default()
            .with_quality(2, 5)
            .with_background(Color::new(1.0, 0.25, 0.0));
        let mut rng = StdRng::seed_from_u64(42);

        let image = render(3, 2, |_, _, _| Ray::default(), &world, &config, &mut rng).unwrap();
        assert_eq!(image.pixels.len(), 6);
        assert_eq!(image.get(2, 1), Color::new(1.0, 0.25, 0.0));

        let mut out = Vec::new();
        image.write_pixels(&mut out, config.encoding).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(text.lines().all(|line| line == "255 128 0"));
    }

    #[test]
    fn test_image_buffer_get_set() {
        let mut image = ImageBuffer::new(4, 3);
        image.set(3, 2, Color::ONE);
        assert_eq!(image.get(3, 2), Color::ONE);
        assert_eq!(image.pixels[11], Color::ONE);
        assert_eq!(image.get(0, 0), Color::ZERO);
    }
}
