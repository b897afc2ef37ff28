//! Pure-computation RGBA8 conversion from a [`Raster`].
//!
//! Always available (no feature gate) so any host can reuse the same
//! conversion without the PNG encoder.

use plexus_core::raster::Pixel;
use plexus_core::{Raster, Srgb};

/// Page background behind the particle canvas.
pub const DEFAULT_BACKGROUND: Srgb = Srgb {
    r: 12.0 / 255.0,
    g: 18.0 / 255.0,
    b: 34.0 / 255.0,
};

/// Opacity the page applies to the whole particle canvas.
pub const DEFAULT_CANVAS_OPACITY: f64 = 0.6;

/// An opaque background plus the opacity the canvas is composited at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backdrop {
    pub background: Srgb,
    pub canvas_opacity: f64,
}

impl Backdrop {
    /// Creates a backdrop, clamping `canvas_opacity` to [0, 1].
    pub fn new(background: Srgb, canvas_opacity: f64) -> Self {
        Self {
            background,
            canvas_opacity: canvas_opacity.clamp(0.0, 1.0),
        }
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new(DEFAULT_BACKGROUND, DEFAULT_CANVAS_OPACITY)
    }
}

fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn unpremultiply([r, g, b, a]: Pixel) -> [u8; 4] {
    if a <= 0.0 {
        return [0, 0, 0, 0];
    }
    [quantize(r / a), quantize(g / a), quantize(b / a), quantize(a)]
}

/// Straight-alpha RGBA8 bytes, `width * height * 4` long.
///
/// Fully transparent pixels become `[0, 0, 0, 0]`.
pub fn raster_to_rgba(raster: &Raster) -> Vec<u8> {
    raster
        .pixels()
        .iter()
        .flat_map(|&p| unpremultiply(p))
        .collect()
}

/// Opaque RGBA8 bytes: the raster scaled by the canvas opacity and composited
/// source-over onto the background.
pub fn composite_rgba(raster: &Raster, backdrop: &Backdrop) -> Vec<u8> {
    let o = backdrop.canvas_opacity as f32;
    let bg = [
        backdrop.background.r as f32,
        backdrop.background.g as f32,
        backdrop.background.b as f32,
    ];
    raster
        .pixels()
        .iter()
        .flat_map(|&[r, g, b, a]| {
            let keep = 1.0 - a * o;
            [
                quantize(r * o + bg[0] * keep),
                quantize(g * o + bg[1] * keep),
                quantize(b * o + bg[2] * keep),
                255u8,
            ]
        })
        .collect()
}
