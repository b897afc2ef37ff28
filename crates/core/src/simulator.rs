//! Per-tick state transition for a [`Field`].
//!
//! Each tick moves every particle by its velocity, advances its pulse phase
//! and wraps it toroidally. Particles never interact here; the only coupling
//! between particles is the connection pass in the renderer.

use crate::config::FieldConfig;
use crate::field::Field;

/// Advances particle state by fixed per-tick increments.
///
/// Motion is coupled to the tick rate: there is no elapsed-time correction,
/// so effective speed follows the host's refresh rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simulator {
    pulse_increment: f64,
}

impl Simulator {
    /// Creates a simulator advancing the pulse phase by `pulse_increment` per tick.
    pub fn new(pulse_increment: f64) -> Self {
        Self { pulse_increment }
    }

    /// Creates a simulator from `config.pulse_increment`.
    pub fn from_config(config: &FieldConfig) -> Self {
        Self::new(config.pulse_increment)
    }

    /// Returns the per-tick phase advance.
    pub fn pulse_increment(&self) -> f64 {
        self.pulse_increment
    }

    /// Advances every particle by one tick.
    ///
    /// A field without area (zero or negative bounds after a resize) is left
    /// untouched.
    pub fn advance(&self, field: &mut Field) {
        if !field.has_area() {
            log::trace!("skipping tick on degenerate {}x{} field", field.width(), field.height());
            return;
        }
        let (width, height) = (field.width(), field.height());
        for p in field.particles_mut() {
            let velocity = p.velocity();
            p.position += velocity;
            p.phase += self.pulse_increment;
            p.position.x = wrap(p.position.x, width);
            p.position.y = wrap(p.position.y, height);
        }
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::from_config(&FieldConfig::default())
    }
}

/// Toroidal teleport: below zero jumps to `extent`, above `extent` jumps to zero.
fn wrap(v: f64, extent: f64) -> f64 {
    if v < 0.0 {
        extent
    } else if v > extent {
        0.0
    } else {
        v
    }
}
