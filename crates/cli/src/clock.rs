//! Fixed-rate frame clock for headless animation.

use plexus_core::{FrameClock, FrameHandle, PlexusError};
use std::thread;
use std::time::{Duration, Instant};

/// Stands in for a display refresh: fires at most one pending request per
/// interval, sleeping the calling thread until it is due.
///
/// A zero rate fires immediately (render as fast as possible).
pub struct PacedClock {
    interval: Duration,
    deadline: Instant,
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl PacedClock {
    /// Creates a clock firing at `fps`; zero, negative or NaN rates fire immediately.
    pub fn new(fps: f64) -> Self {
        let interval = if fps.is_finite() && fps > 0.0 {
            Duration::from_secs_f64(1.0 / fps)
        } else {
            Duration::ZERO
        };
        Self {
            interval,
            deadline: Instant::now() + interval,
            next_id: 0,
            pending: None,
        }
    }

    /// Returns the time between frames.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Blocks until the pending request is due and returns it.
    ///
    /// Returns `None` when nothing is pending, which ends the host loop.
    pub fn wait(&mut self) -> Option<FrameHandle> {
        let handle = self.pending.take()?;
        let now = Instant::now();
        if self.deadline > now {
            thread::sleep(self.deadline - now);
            self.deadline += self.interval;
        } else {
            // Fell behind: resume pacing from now instead of bursting.
            self.deadline = now + self.interval;
        }
        Some(handle)
    }
}

impl FrameClock for PacedClock {
    fn request_frame(&mut self) -> Result<FrameHandle, PlexusError> {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}
