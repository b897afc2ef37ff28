//! State of a single moving, pulsing point.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A particle's position, fixed velocity, fixed look and pulse phase.
///
/// Only `position` and `phase` change after creation, and only through the
/// [`Simulator`](crate::simulator::Simulator).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub(crate) position: DVec2,
    velocity: DVec2,
    size: f64,
    opacity: f64,
    pub(crate) phase: f64,
}

impl Particle {
    /// Creates a particle from explicit state.
    ///
    /// `size` is the baseline radius; `opacity` the baseline alpha before
    /// pulse modulation.
    pub fn new(position: DVec2, velocity: DVec2, size: f64, opacity: f64, phase: f64) -> Self {
        Self {
            position,
            velocity,
            size,
            opacity,
            phase,
        }
    }

    /// Returns the current position.
    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Returns the per-tick displacement, fixed at creation.
    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// Returns the baseline radius.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Returns the baseline alpha before pulse modulation.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Returns the pulse phase in radians (unwrapped).
    pub fn phase(&self) -> f64 {
        self.phase
    }
}
