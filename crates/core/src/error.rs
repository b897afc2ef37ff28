//! Error types for the plexus core.

use thiserror::Error;

/// Errors produced by field, scheduler and output operations.
#[derive(Debug, Error)]
pub enum PlexusError {
    /// Width or height was non-positive (or not finite) when creating a Field.
    #[error("invalid dimensions {width}x{height}: width and height must be positive")]
    InvalidDimensions { width: f64, height: f64 },

    /// The host provided no drawable surface.
    #[error("drawable surface unavailable")]
    SurfaceUnavailable,

    /// The host provided no refresh-synchronized scheduling primitive.
    #[error("frame clock unavailable: cannot animate")]
    ClockUnavailable,

    /// The frame clock failed to schedule the next frame.
    #[error("frame request failed: {0}")]
    FrameRequest(String),

    /// A lifecycle operation was attempted in a state that does not allow it.
    #[error("cannot {action} while scheduler is {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    /// A configuration value was out of its accepted range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// An output operation (file write, encoding) failed.
    #[error("i/o error: {0}")]
    Io(String),
}
