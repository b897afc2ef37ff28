//! Reproducible record of a single frame.
//!
//! A [`Seed`] captures everything needed to recreate a field state: surface
//! size, PRNG seed, number of ticks and the full configuration. Simulation
//! has no hidden randomness, so replaying a seed is bit-exact.

use crate::config::FieldConfig;
use crate::error::PlexusError;
use crate::field::Field;
use crate::prng::Xorshift64;
use crate::raster::buffer_fits;
use crate::simulator::Simulator;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub width: f64,
    pub height: f64,
    pub seed: u64,
    #[serde(default)]
    pub ticks: u64,
    #[serde(default)]
    pub config: FieldConfig,
}

impl Seed {
    /// Creates a seed with the default config and zero ticks.
    pub fn new(width: f64, height: f64, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
            ticks: 0,
            config: FieldConfig::default(),
        }
    }

    /// Checks the surface size and the config.
    ///
    /// A size whose pixel buffer could not be addressed is rejected along
    /// with non-positive sizes.
    pub fn validate(&self) -> Result<(), PlexusError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(self.width) && positive(self.height) && buffer_fits(self.width, self.height))
        {
            return Err(PlexusError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        self.config.validate()
    }

    /// Regenerates the field and advances it `ticks` times.
    pub fn replay(&self) -> Result<Field, PlexusError> {
        self.validate()?;
        let mut field = Field::generate(
            self.width,
            self.height,
            &self.config,
            &mut Xorshift64::new(self.seed),
        )?;
        let simulator = Simulator::from_config(&self.config);
        for _ in 0..self.ticks {
            simulator.advance(&mut field);
        }
        Ok(field)
    }
}
