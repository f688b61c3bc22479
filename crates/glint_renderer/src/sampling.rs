//! Random sampling helpers.
//!
//! Every function draws from a caller-owned RNG so concurrent traces never
//! share generator state. Seed one `StdRng` per task for reproducible output.

use glint_math::Vec3;
use rand::{Rng, RngCore};

/// Components smaller than this are treated as zero by [`near_zero`].
const NEAR_ZERO_EPSILON: f32 = 1e-8;

/// Generate a uniform f32 in [0.0, 1.0).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Generate a uniform f32 in [min, max).
#[inline]
fn gen_f32_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Generate a random unit vector uniformly distributed on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling inside the unit ball, then project to the surface
    loop {
        let v = Vec3::new(
            gen_f32_range(rng, -1.0, 1.0),
            gen_f32_range(rng, -1.0, 1.0),
            gen_f32_range(rng, -1.0, 1.0),
        );
        let len_sq = v.length_squared();
        // Tiny vectors would blow up on normalization
        if len_sq > 1e-30 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Generate a random point inside the unit disk on the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f32_range(rng, -1.0, 1.0), gen_f32_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// True if every component of `v` is close to zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.abs().max_element() < NEAR_ZERO_EPSILON
}
