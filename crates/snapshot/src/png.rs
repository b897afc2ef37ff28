//! PNG output of a [`Raster`].
//!
//! Feature-gated behind `png` (default on). The byte conversion itself lives
//! in [`crate::pixel`].

use plexus_core::{PlexusError, Raster};
use std::path::{Path, PathBuf};

use crate::pixel::{composite_rgba, raster_to_rgba, Backdrop};

/// Writes a raster as a PNG.
///
/// With a backdrop the image is opaque (composited as the page shows it);
/// without one the canvas transparency is preserved. Returns
/// `PlexusError::InvalidDimensions` for an empty raster and `PlexusError::Io`
/// on encode or write failure.
pub fn write_png(
    raster: &Raster,
    backdrop: Option<&Backdrop>,
    path: &Path,
) -> Result<(), PlexusError> {
    let invalid = || PlexusError::InvalidDimensions {
        width: raster.pixel_width() as f64,
        height: raster.pixel_height() as f64,
    };
    if raster.pixels().is_empty() {
        return Err(invalid());
    }
    let w = u32::try_from(raster.pixel_width()).map_err(|_| invalid())?;
    let h = u32::try_from(raster.pixel_height()).map_err(|_| invalid())?;
    let rgba = match backdrop {
        Some(backdrop) => composite_rgba(raster, backdrop),
        None => raster_to_rgba(raster),
    };
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| PlexusError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| PlexusError::Io(format!("{}: {e}", path.display())))?;
    log::debug!("wrote {w}x{h} frame to {}", path.display());
    Ok(())
}

/// Path of frame `index` in a numbered sequence: `dir/frame_00042.png`.
pub fn frame_path(dir: &Path, index: u64) -> PathBuf {
    dir.join(format!("frame_{index:05}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use plexus_core::{Srgb, Surface};

    fn painted(width: usize, height: usize) -> Raster {
        let mut r = Raster::new(width, height).unwrap();
        r.fill_disc(DVec2::new(4.0, 4.0), 2.0, Srgb::default().with_alpha(0.8));
        r
    }

    #[test]
    fn write_png_round_trip_with_backdrop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        write_png(&painted(16, 12), Some(&Backdrop::default()), &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 12);
        assert_eq!(img.get_pixel(15, 11).0, [12, 18, 34, 255]);
    }

    #[test]
    fn write_png_preserves_transparency_without_backdrop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        write_png(&painted(16, 12), None, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(15, 11).0[3], 0);
        assert!(img.get_pixel(4, 4).0[3] > 0);
    }

    #[test]
    fn write_png_rejects_empty_raster() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_png(&Raster::new(0, 5).unwrap(), None, &dir.path().join("x.png"));
        assert!(matches!(result, Err(PlexusError::InvalidDimensions { .. })));
    }

    #[test]
    fn write_png_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("x.png");
        let result = write_png(&painted(8, 8), None, &path);
        assert!(matches!(result, Err(PlexusError::Io(_))));
    }

    #[test]
    fn frame_path_is_zero_padded() {
        let p = frame_path(Path::new("out"), 42);
        assert_eq!(p, Path::new("out").join("frame_00042.png"));
    }
}
