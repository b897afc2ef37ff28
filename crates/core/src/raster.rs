//! CPU raster surface.
//!
//! Pixels are stored as premultiplied RGBA `f32` in row-major order. Discs
//! and lines are anti-aliased by pixel-center coverage and composited
//! source-over, the same way a canvas 2D context blends them.

use crate::color::Rgba;
use crate::error::PlexusError;
use crate::surface::Surface;
use glam::DVec2;

/// Premultiplied RGBA pixel.
pub type Pixel = [f32; 4];

/// A CPU-side RGBA surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl Raster {
    /// Creates a transparent raster. Either dimension may be zero.
    ///
    /// Returns `PlexusError::InvalidDimensions` if the pixel buffer cannot be
    /// allocated (area overflow or allocation failure).
    pub fn new(width: usize, height: usize) -> Result<Self, PlexusError> {
        let invalid = || PlexusError::InvalidDimensions {
            width: width as f64,
            height: height as f64,
        };
        let len = width.checked_mul(height).ok_or_else(invalid)?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| invalid())?;
        pixels.resize(len, [0.0; 4]);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Creates a transparent raster for a surface of `width × height`,
    /// rounded to whole pixels.
    pub fn for_surface(width: f64, height: f64) -> Result<Self, PlexusError> {
        Self::new(pixel_extent(width), pixel_extent(height))
            .map_err(|_| PlexusError::InvalidDimensions { width, height })
    }

    /// Returns the width in pixels.
    pub fn pixel_width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn pixel_height(&self) -> usize {
        self.height
    }

    /// Premultiplied pixels in row-major order.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Pixel> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    fn blend(&mut self, x: usize, y: usize, rgba: Rgba, coverage: f64) {
        let a = (rgba.alpha * coverage).clamp(0.0, 1.0) as f32;
        if a <= 0.0 {
            return;
        }
        let src = [
            rgba.color.r as f32 * a,
            rgba.color.g as f32 * a,
            rgba.color.b as f32 * a,
            a,
        ];
        let dst = &mut self.pixels[y * self.width + x];
        for (d, s) in dst.iter_mut().zip(src) {
            *d = s + *d * (1.0 - a);
        }
    }

    /// Clamps `[lo, hi)` in surface coordinates to a pixel index range.
    fn span(lo: f64, hi: f64, extent: usize) -> Option<(usize, usize)> {
        let lo = lo.floor().max(0.0);
        let hi = hi.ceil().min(extent as f64);
        (lo < hi).then(|| (lo as usize, hi as usize))
    }

    fn cover(&mut self, min: DVec2, max: DVec2, rgba: Rgba, coverage: impl Fn(DVec2) -> f64) {
        let Some((x0, x1)) = Self::span(min.x, max.x, self.width) else {
            return;
        };
        let Some((y0, y1)) = Self::span(min.y, max.y, self.height) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let c = coverage(DVec2::new(x as f64 + 0.5, y as f64 + 0.5));
                if c > 0.0 {
                    self.blend(x, y, rgba, c);
                }
            }
        }
    }
}

impl Default for Raster {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        }
    }
}

/// Rounds a surface dimension to whole pixels; degenerate sizes become zero.
fn pixel_extent(v: f64) -> usize {
    if v.is_finite() && v > 0.0 {
        v.round() as usize
    } else {
        0
    }
}

/// True when a raster for a `width × height` surface has an addressable
/// pixel buffer.
pub(crate) fn buffer_fits(width: f64, height: f64) -> bool {
    pixel_extent(width)
        .checked_mul(pixel_extent(height))
        .and_then(|len| len.checked_mul(std::mem::size_of::<Pixel>()))
        .is_some_and(|bytes| bytes <= isize::MAX as usize)
}

/// Distance from `p` to the segment `a`–`b`.
fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    let t = if len2 > 0.0 {
        ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    p.distance(a + ab * t)
}

impl Surface for Raster {
    fn width(&self) -> f64 {
        self.width as f64
    }

    fn height(&self) -> f64 {
        self.height as f64
    }

    fn resize(&mut self, width: f64, height: f64) {
        *self = match Raster::for_surface(width, height) {
            Ok(raster) => raster,
            Err(e) => {
                log::error!("cannot resize raster: {e}");
                Raster::default()
            }
        };
    }

    fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    fn fill_disc(&mut self, center: DVec2, radius: f64, color: Rgba) {
        if !center.is_finite() || !(radius > 0.0) {
            return;
        }
        let reach = DVec2::splat(radius + 1.0);
        self.cover(center - reach, center + reach, color, |p| {
            (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0)
        });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        if !from.is_finite() || !to.is_finite() || !(width > 0.0) {
            return;
        }
        // Sub-pixel strokes keep a one-pixel footprint and scale intensity instead.
        let half = (width / 2.0).max(0.5);
        let intensity = width.min(1.0);
        let reach = DVec2::splat(half + 1.0);
        self.cover(from.min(to) - reach, from.max(to) + reach, color, |p| {
            intensity * (half + 0.5 - segment_distance(p, from, to)).clamp(0.0, 1.0)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;

    fn accent(alpha: f64) -> Rgba {
        Srgb::default().with_alpha(alpha)
    }

    #[test]
    fn new_raster_is_transparent() {
        let r = Raster::new(4, 3).unwrap();
        assert_eq!(r.pixels().len(), 12);
        assert!(r.pixels().iter().all(|p| *p == [0.0; 4]));
    }

    #[test]
    fn disc_paints_center_with_full_coverage() {
        let mut r = Raster::new(20, 20).unwrap();
        r.fill_disc(DVec2::new(10.0, 10.0), 3.0, accent(0.5));
        let center = r.pixel(10, 10).unwrap();
        assert!((center[3] - 0.5).abs() < 1e-6, "alpha {}", center[3]);
        assert_eq!(r.pixel(0, 0).unwrap(), [0.0; 4]);
    }

    #[test]
    fn disc_color_is_premultiplied() {
        let mut r = Raster::new(10, 10).unwrap();
        r.fill_disc(DVec2::new(5.0, 5.0), 2.0, accent(1.0));
        let p = r.pixel(5, 5).unwrap();
        let c = Srgb::default();
        assert!((p[0] - c.r as f32).abs() < 1e-6);
        assert!((p[1] - c.g as f32).abs() < 1e-6);
        assert!((p[2] - c.b as f32).abs() < 1e-6);
        assert!((p[3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn clear_removes_previous_frame() {
        let mut r = Raster::new(10, 10).unwrap();
        r.fill_disc(DVec2::new(5.0, 5.0), 2.0, accent(1.0));
        r.clear();
        assert!(r.pixels().iter().all(|p| *p == [0.0; 4]));
    }

    #[test]
    fn line_paints_midpoint_and_skips_far_pixels() {
        let mut r = Raster::new(40, 10).unwrap();
        r.stroke_line(DVec2::new(2.0, 5.5), DVec2::new(38.0, 5.5), 1.0, accent(1.0));
        assert!(r.pixel(20, 5).unwrap()[3] > 0.9);
        assert_eq!(r.pixel(20, 0).unwrap(), [0.0; 4]);
    }

    #[test]
    fn thin_line_scales_intensity() {
        let mut r = Raster::new(40, 10).unwrap();
        r.stroke_line(DVec2::new(2.0, 5.5), DVec2::new(38.0, 5.5), 0.5, accent(1.0));
        let a = r.pixel(20, 5).unwrap()[3];
        assert!((a - 0.5).abs() < 1e-6, "alpha {a}");
    }

    #[test]
    fn drawing_outside_bounds_is_clipped() {
        let mut r = Raster::new(10, 10).unwrap();
        r.fill_disc(DVec2::new(-50.0, -50.0), 3.0, accent(1.0));
        r.stroke_line(DVec2::new(-100.0, 200.0), DVec2::new(-90.0, 300.0), 1.0, accent(1.0));
        assert!(r.pixels().iter().all(|p| *p == [0.0; 4]));
    }

    #[test]
    fn partially_visible_disc_paints_inside_part() {
        let mut r = Raster::new(10, 10).unwrap();
        r.fill_disc(DVec2::new(0.0, 0.0), 3.0, accent(1.0));
        assert!(r.pixel(0, 0).unwrap()[3] > 0.9);
    }

    #[test]
    fn overlapping_draws_never_exceed_full_alpha() {
        let mut r = Raster::new(8, 8).unwrap();
        for _ in 0..50 {
            r.fill_disc(DVec2::new(4.0, 4.0), 3.0, accent(0.6));
        }
        assert!(r.pixels().iter().all(|p| p[3] <= 1.0 + 1e-6));
        assert!(r.pixel(4, 4).unwrap()[3] > 0.99);
    }

    #[test]
    fn zero_sized_raster_accepts_draws() {
        let mut r = Raster::default();
        r.fill_disc(DVec2::new(1.0, 1.0), 1.0, accent(1.0));
        r.stroke_line(DVec2::ZERO, DVec2::ONE, 1.0, accent(1.0));
        r.clear();
        assert!(r.pixels().is_empty());
    }

    #[test]
    fn resize_rounds_and_clears() {
        let mut r = Raster::new(4, 4).unwrap();
        r.fill_disc(DVec2::new(2.0, 2.0), 2.0, accent(1.0));
        r.resize(10.4, 0.0);
        assert_eq!(r.pixel_width(), 10);
        assert_eq!(r.pixel_height(), 0);
        r.resize(6.0, 5.0);
        assert_eq!(r.pixels().len(), 30);
        assert!(r.pixels().iter().all(|p| *p == [0.0; 4]));
    }

    #[test]
    fn oversized_raster_is_rejected() {
        assert!(matches!(
            Raster::new(usize::MAX, 2),
            Err(PlexusError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Raster::for_surface(1e19, 1e19),
            Err(PlexusError::InvalidDimensions { .. })
        ));
        assert!(!buffer_fits(1e19, 1e19));
        assert!(buffer_fits(800.0, 3000.0));
    }

    #[test]
    fn oversized_resize_leaves_empty_raster() {
        let mut r = Raster::new(4, 4).unwrap();
        r.resize(1e19, 1e19);
        assert_eq!(r.pixel_width(), 0);
        assert_eq!(r.pixel_height(), 0);
        assert!(r.pixels().is_empty());
    }

    #[test]
    fn for_surface_rounds_dimensions() {
        let r = Raster::for_surface(10.4, 2.6).unwrap();
        assert_eq!((r.pixel_width(), r.pixel_height()), (10, 3));
    }

    #[test]
    fn pixel_outside_returns_none() {
        let r = Raster::new(2, 2).unwrap();
        assert!(r.pixel(2, 0).is_none());
        assert!(r.pixel(0, 2).is_none());
    }
}
