//! The drawable-surface seam between the renderer and a host.
//!
//! The renderer only needs five operations from a host target: report and
//! change its size, clear, fill a disc, stroke a line. [`DisplayList`] is the
//! recording implementation; [`Raster`](crate::raster::Raster) rasterizes on
//! the CPU; the browser crate paints to a canvas 2D context.

use crate::color::Rgba;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A paintable target with alpha blending.
pub trait Surface {
    /// Width in device pixels.
    fn width(&self) -> f64;

    /// Height in device pixels.
    fn height(&self) -> f64;

    /// Changes the surface size. Contents after a resize are unspecified
    /// until the next full paint.
    fn resize(&mut self, width: f64, height: f64);

    /// Clears the whole surface to transparent.
    fn clear(&mut self);

    /// Fills a disc, blending `color` source-over.
    fn fill_disc(&mut self, center: DVec2, radius: f64, color: Rgba);

    /// Strokes a straight segment of the given width, blending `color` source-over.
    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba);
}

/// One recorded paint operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Disc {
        center: DVec2,
        radius: f64,
        color: Rgba,
    },
    Line {
        from: DVec2,
        to: DVec2,
        width: f64,
        color: Rgba,
    },
}

/// A surface that records draw commands instead of producing pixels.
///
/// `clear` drops every recorded command, so after a paint the list holds
/// exactly one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayList {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    /// Creates an empty list for a `width × height` surface.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Returns every recorded command in paint order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Recorded discs in paint order.
    pub fn discs(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Disc { .. }))
    }

    /// Recorded lines in paint order.
    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }
}

impl Surface for DisplayList {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    fn clear(&mut self) {
        self.commands.clear();
    }

    fn fill_disc(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Disc {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}
