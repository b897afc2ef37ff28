//! The particle collection plus the surface bounds it lives in.
//!
//! A [`Field`] is created once per session with a fixed particle count.
//! Particles are stored in insertion order, which only matters for the
//! pairwise connection pass. The bounds follow the surface on resize; the
//! particles themselves are never regenerated or repositioned by a resize.

use crate::config::FieldConfig;
use crate::error::PlexusError;
use crate::particle::Particle;
use crate::prng::Xorshift64;
use glam::DVec2;

/// Fixed-size particle collection and the current surface dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
}

impl Field {
    /// Generates `config.count` particles uniformly over `[0, width) × [0, height)`.
    ///
    /// Velocity, size, opacity and phase are drawn from the ranges in
    /// `config`. Returns `PlexusError::InvalidDimensions` if either dimension
    /// is non-positive or not finite.
    pub fn generate(
        width: f64,
        height: f64,
        config: &FieldConfig,
        rng: &mut Xorshift64,
    ) -> Result<Self, PlexusError> {
        check_dimensions(width, height)?;
        let particles: Vec<Particle> = (0..config.count)
            .map(|_| {
                let position = DVec2::new(rng.next_range(0.0, width), rng.next_range(0.0, height));
                let velocity = DVec2::new(
                    rng.next_symmetric(config.max_speed),
                    rng.next_symmetric(config.max_speed),
                );
                let size = rng.next_range(config.size_min, config.size_max);
                let opacity = rng.next_range(config.opacity_min, config.opacity_max);
                Particle::new(position, velocity, size, opacity, rng.next_angle())
            })
            .collect();
        log::debug!(
            "generated {} particles on a {width}x{height} surface",
            particles.len()
        );
        Ok(Self {
            width,
            height,
            particles,
        })
    }

    /// Builds a field from explicit particle states.
    ///
    /// Positions are taken as given, even outside the bounds; the next tick
    /// wraps them. Returns `PlexusError::InvalidDimensions` for a degenerate
    /// surface.
    pub fn from_particles(
        width: f64,
        height: f64,
        particles: Vec<Particle>,
    ) -> Result<Self, PlexusError> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            particles,
        })
    }

    /// Current surface width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Current surface height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Number of particles. Constant for the lifetime of the field.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Returns true when the field has no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Read-only access to the particles in insertion order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Records new surface dimensions without touching any particle.
    ///
    /// Degenerate sizes are accepted here (a host may report zero during
    /// teardown); ticks on a field without area are no-ops.
    pub fn set_bounds(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// True when both dimensions are positive and finite.
    pub fn has_area(&self) -> bool {
        is_positive(self.width) && is_positive(self.height)
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn check_dimensions(width: f64, height: f64) -> Result<(), PlexusError> {
    if is_positive(width) && is_positive(height) {
        Ok(())
    } else {
        Err(PlexusError::InvalidDimensions { width, height })
    }
}
