#![deny(unsafe_code)]
//! Core types for the plexus particle-field animation.
//!
//! Provides the [`Particle`] and [`Field`] data model, the per-tick
//! [`Simulator`], the frame [`Renderer`], the [`Surface`] and [`FrameClock`]
//! host seams with headless implementations ([`Raster`], [`DisplayList`],
//! [`ManualClock`]), and the [`Scheduler`] that owns a session's lifecycle.

pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod params;
pub mod particle;
pub mod prng;
pub mod raster;
pub mod renderer;
pub mod scheduler;
pub mod seed;
pub mod simulator;
pub mod surface;

pub use clock::{FrameClock, FrameHandle, ManualClock};
pub use color::{Rgba, Srgb};
pub use config::FieldConfig;
pub use error::PlexusError;
pub use field::Field;
pub use particle::Particle;
pub use prng::Xorshift64;
pub use raster::Raster;
pub use renderer::Renderer;
pub use scheduler::{Scheduler, SchedulerState, Session};
pub use seed::Seed;
pub use simulator::Simulator;
pub use surface::{DisplayList, DrawCommand, Surface};
