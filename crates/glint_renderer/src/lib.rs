//! Glint Renderer - CPU light transport kernel
//!
//! Traces a ray through a scene of intersectable surfaces, scatters it off
//! Lambertian, metal and dielectric materials, and encodes the resulting
//! radiance as displayable 8-bit pixel triples.
//!
//! Camera placement, image layout and work distribution across threads are
//! left to the caller; see `examples/simple_render.rs` for a complete host.

mod color;
mod hittable;
mod material;
mod renderer;
mod sampling;
mod sphere;

pub use color::{
    color_to_bytes, linear_to_gamma, write_color, write_pixels, Color, Encoding, OutputError,
};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use renderer::{
    ray_color, render, render_pixel, ConfigError, ImageBuffer, RenderConfig, SEARCH_INTERVAL,
};
pub use sampling::{gen_f32, near_zero, random_in_unit_disk, random_unit_vector};
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{Interval, Ray, Vec3};
