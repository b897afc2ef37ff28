//! Tuning constants for a particle field session.
//!
//! Every knob that shapes the animation lives in [`FieldConfig`]: density
//! (`count`), motion (`max_speed`, `pulse_increment`), particle look
//! (`size_*`, `opacity_*`, `accent`), the connection graph
//! (`connection_threshold`, `line_alpha`, `line_width`) and how the surface is
//! sized from the viewport (`height_multiplier`).

use crate::color::{Srgb, DEFAULT_ACCENT};
use crate::error::PlexusError;
use crate::params::{param_f64, param_string, param_usize};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_COUNT: usize = 120;
pub const DEFAULT_MAX_SPEED: f64 = 0.15;
pub const DEFAULT_SIZE_MIN: f64 = 0.5;
pub const DEFAULT_SIZE_MAX: f64 = 2.5;
pub const DEFAULT_OPACITY_MIN: f64 = 0.1;
pub const DEFAULT_OPACITY_MAX: f64 = 0.6;
/// Phase advance per tick; one full glow cycle takes about 314 ticks.
pub const DEFAULT_PULSE_INCREMENT: f64 = 0.02;
pub const DEFAULT_CONNECTION_THRESHOLD: f64 = 150.0;
pub const DEFAULT_LINE_ALPHA: f64 = 0.06;
pub const DEFAULT_LINE_WIDTH: f64 = 0.5;
/// Surface height as a multiple of viewport height (scroll-tall background).
pub const DEFAULT_HEIGHT_MULTIPLIER: f64 = 5.0;

/// Above this many particles the pairwise connection pass gets expensive.
pub const QUADRATIC_WARN_COUNT: usize = 1000;

/// Configuration for one particle field session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub count: usize,
    pub max_speed: f64,
    pub size_min: f64,
    pub size_max: f64,
    pub opacity_min: f64,
    pub opacity_max: f64,
    pub pulse_increment: f64,
    pub connection_threshold: f64,
    pub line_alpha: f64,
    pub line_width: f64,
    pub accent: Srgb,
    pub height_multiplier: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            max_speed: DEFAULT_MAX_SPEED,
            size_min: DEFAULT_SIZE_MIN,
            size_max: DEFAULT_SIZE_MAX,
            opacity_min: DEFAULT_OPACITY_MIN,
            opacity_max: DEFAULT_OPACITY_MAX,
            pulse_increment: DEFAULT_PULSE_INCREMENT,
            connection_threshold: DEFAULT_CONNECTION_THRESHOLD,
            line_alpha: DEFAULT_LINE_ALPHA,
            line_width: DEFAULT_LINE_WIDTH,
            accent: Srgb::default(),
            height_multiplier: DEFAULT_HEIGHT_MULTIPLIER,
        }
    }
}

impl FieldConfig {
    /// Builds a config from a JSON params object, falling back to defaults
    /// for missing or wrongly typed keys.
    ///
    /// Only the accent can fail here: a present but unparsable hex string
    /// returns `PlexusError::InvalidColor`.
    pub fn from_json(params: &Value) -> Result<Self, PlexusError> {
        let accent = Srgb::from_hex(&param_string(params, "accent", DEFAULT_ACCENT))?;
        Ok(Self {
            count: param_usize(params, "count", DEFAULT_COUNT),
            max_speed: param_f64(params, "max_speed", DEFAULT_MAX_SPEED),
            size_min: param_f64(params, "size_min", DEFAULT_SIZE_MIN),
            size_max: param_f64(params, "size_max", DEFAULT_SIZE_MAX),
            opacity_min: param_f64(params, "opacity_min", DEFAULT_OPACITY_MIN),
            opacity_max: param_f64(params, "opacity_max", DEFAULT_OPACITY_MAX),
            pulse_increment: param_f64(params, "pulse_increment", DEFAULT_PULSE_INCREMENT),
            connection_threshold: param_f64(
                params,
                "connection_threshold",
                DEFAULT_CONNECTION_THRESHOLD,
            ),
            line_alpha: param_f64(params, "line_alpha", DEFAULT_LINE_ALPHA),
            line_width: param_f64(params, "line_width", DEFAULT_LINE_WIDTH),
            accent,
            height_multiplier: param_f64(params, "height_multiplier", DEFAULT_HEIGHT_MULTIPLIER),
        })
    }

    /// Current values as a flat JSON object (same keys `from_json` reads).
    pub fn params(&self) -> Value {
        json!({
            "count": self.count,
            "max_speed": self.max_speed,
            "size_min": self.size_min,
            "size_max": self.size_max,
            "opacity_min": self.opacity_min,
            "opacity_max": self.opacity_max,
            "pulse_increment": self.pulse_increment,
            "connection_threshold": self.connection_threshold,
            "line_alpha": self.line_alpha,
            "line_width": self.line_width,
            "accent": self.accent.to_hex(),
            "height_multiplier": self.height_multiplier,
        })
    }

    /// Schema describing every parameter, its type, range and default.
    pub fn param_schema() -> Value {
        json!({
            "count": {
                "type": "integer",
                "default": DEFAULT_COUNT,
                "min": 0,
                "description": "Number of particles; render cost grows quadratically"
            },
            "max_speed": {
                "type": "number",
                "default": DEFAULT_MAX_SPEED,
                "min": 0.0,
                "description": "Velocity components are drawn from [-max_speed, max_speed)"
            },
            "size_min": {
                "type": "number",
                "default": DEFAULT_SIZE_MIN,
                "min": 0.0,
                "exclusive_min": true,
                "description": "Smallest baseline particle radius"
            },
            "size_max": {
                "type": "number",
                "default": DEFAULT_SIZE_MAX,
                "description": "Largest baseline particle radius"
            },
            "opacity_min": {
                "type": "number",
                "default": DEFAULT_OPACITY_MIN,
                "min": 0.0,
                "exclusive_min": true,
                "max": 1.0,
                "description": "Smallest baseline particle alpha"
            },
            "opacity_max": {
                "type": "number",
                "default": DEFAULT_OPACITY_MAX,
                "max": 1.0,
                "description": "Largest baseline particle alpha"
            },
            "pulse_increment": {
                "type": "number",
                "default": DEFAULT_PULSE_INCREMENT,
                "description": "Glow phase advance per tick (speed of the pulse)"
            },
            "connection_threshold": {
                "type": "number",
                "default": DEFAULT_CONNECTION_THRESHOLD,
                "min": 0.0,
                "description": "Maximum distance at which two particles are linked"
            },
            "line_alpha": {
                "type": "number",
                "default": DEFAULT_LINE_ALPHA,
                "min": 0.0,
                "max": 1.0,
                "description": "Connection alpha at zero distance"
            },
            "line_width": {
                "type": "number",
                "default": DEFAULT_LINE_WIDTH,
                "min": 0.0,
                "description": "Connection stroke width"
            },
            "accent": {
                "type": "string",
                "default": DEFAULT_ACCENT,
                "description": "Hex color shared by particles and connections"
            },
            "height_multiplier": {
                "type": "number",
                "default": DEFAULT_HEIGHT_MULTIPLIER,
                "min": 0.0,
                "exclusive_min": true,
                "description": "Surface height as a multiple of viewport height"
            }
        })
    }

    /// Checks every value against its accepted range.
    ///
    /// A zero `count` and a zero `connection_threshold` are valid and yield an
    /// empty or unconnected field.
    pub fn validate(&self) -> Result<(), PlexusError> {
        let finite = [
            ("max_speed", self.max_speed),
            ("size_min", self.size_min),
            ("size_max", self.size_max),
            ("opacity_min", self.opacity_min),
            ("opacity_max", self.opacity_max),
            ("pulse_increment", self.pulse_increment),
            ("connection_threshold", self.connection_threshold),
            ("line_alpha", self.line_alpha),
            ("line_width", self.line_width),
            ("height_multiplier", self.height_multiplier),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} must be finite")));
        }
        if self.max_speed < 0.0 {
            return Err(invalid("max_speed must be non-negative"));
        }
        if self.size_min <= 0.0 || self.size_min > self.size_max {
            return Err(invalid("size range must satisfy 0 < size_min <= size_max"));
        }
        if self.opacity_min <= 0.0 || self.opacity_min > self.opacity_max || self.opacity_max > 1.0
        {
            return Err(invalid(
                "opacity range must satisfy 0 < opacity_min <= opacity_max <= 1",
            ));
        }
        if self.connection_threshold < 0.0 {
            return Err(invalid("connection_threshold must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.line_alpha) {
            return Err(invalid("line_alpha must be in [0, 1]"));
        }
        if self.line_width < 0.0 {
            return Err(invalid("line_width must be non-negative"));
        }
        if self.height_multiplier <= 0.0 {
            return Err(invalid("height_multiplier must be positive"));
        }
        if self.count > QUADRATIC_WARN_COUNT {
            log::warn!(
                "{} particles: the connection pass checks {} pairs per frame",
                self.count,
                self.count.saturating_mul(self.count - 1) / 2
            );
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> PlexusError {
    PlexusError::InvalidConfig(msg.into())
}
