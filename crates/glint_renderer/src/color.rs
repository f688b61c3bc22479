//! Color pipeline: linear radiance to 8-bit pixel triples.
//!
//! Radiance stays in unbounded linear light until output. Encoding then runs
//! in two steps: an optional gamma-2 transform per channel, followed by a
//! clamp to `[0.000, 0.999]` and truncation of `256 * c` to a byte.

use glint_math::{Interval, Vec3};
use std::io::Write;
use thiserror::Error;

/// Color type alias (linear RGB, unbounded)
pub type Color = Vec3;

/// Clamp range for quantization. The upper bound stays below 1.0 so
/// `256 * c` never truncates to 256.
const INTENSITY: Interval = Interval::new(0.000, 0.999);

/// How linear radiance is transformed before quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Quantize linear values directly.
    Linear,
    /// Apply gamma 2 (square root) before quantizing.
    #[default]
    Gamma,
}

/// Errors raised while streaming pixel triples.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Apply gamma correction (gamma = 2.0).
///
/// Non-positive input maps to 0 rather than NaN.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Quantize one channel that is already encoded.
#[inline]
fn quantize(c: f32) -> u8 {
    // NaN falls through the clamp, `as` maps it to 0
    (256.0 * INTENSITY.clamp(c)) as u8
}

/// Convert a linear color to an 8-bit RGB triple.
pub fn color_to_bytes(color: Color, encoding: Encoding) -> [u8; 3] {
    let encoded = match encoding {
        Encoding::Linear => color,
        Encoding::Gamma => Color::new(
            linear_to_gamma(color.x),
            linear_to_gamma(color.y),
            linear_to_gamma(color.z),
        ),
    };
    [quantize(encoded.x), quantize(encoded.y), quantize(encoded.z)]
}

/// Write a single pixel as `"r g b\n"`.
pub fn write_color<W: Write>(out: &mut W, color: Color, encoding: Encoding) -> Result<(), OutputError> {
    let [r, g, b] = color_to_bytes(color, encoding);
    writeln!(out, "{} {} {}", r, g, b)?;
    Ok(())
}

/// Write a run of pixels, one triple per line, in slice order.
pub fn write_pixels<W: Write>(out: &mut W, pixels: &[Color], encoding: Encoding) -> Result<(), OutputError> {
    for &color in pixels {
        write_color(out, color, encoding)?;
    }
    log::debug!("Wrote {} pixel triples", pixels.len());
    Ok(())
}
