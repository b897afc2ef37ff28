#![deny(unsafe_code)]
//! Turns plexus frames into images.
//!
//! [`pixel`] converts a [`Raster`](plexus_core::Raster) into RGBA8 bytes,
//! either with its transparency intact or flattened over a [`Backdrop`]
//! the way the page shows the canvas. [`png`] writes those bytes to disk and
//! is gated behind the `png` feature (default on) so browser builds do not
//! pull in the `image` crate.

pub mod pixel;

#[cfg(feature = "png")]
pub mod png;

pub use pixel::Backdrop;
