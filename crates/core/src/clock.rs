//! The refresh-synchronized scheduling seam.
//!
//! A [`FrameClock`] accepts "call me back before the next repaint" requests
//! and cancellations. The host delivers a fired request by calling
//! [`Scheduler::on_frame`](crate::scheduler::Scheduler::on_frame) with its
//! handle.

use crate::error::PlexusError;

/// Identifies one outstanding frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// A host primitive that fires one callback per display refresh.
pub trait FrameClock {
    /// Requests a single callback before the next repaint.
    fn request_frame(&mut self) -> Result<FrameHandle, PlexusError>;

    /// Cancels a pending request. Cancelling a fired or unknown handle is a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// A clock fired by hand.
///
/// Holds at most one pending request (the scheduler never issues more).
/// Call [`ManualClock::fire`] to take it and pass it to the scheduler.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    next_id: u64,
    pending: Option<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl ManualClock {
    /// Creates a clock with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the pending request, as if the display refreshed.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Returns the outstanding request without taking it.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Total number of requests made.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total number of requests cancelled while pending.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameClock for ManualClock {
    fn request_frame(&mut self) -> Result<FrameHandle, PlexusError> {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique() {
        let mut clock = ManualClock::new();
        let a = clock.request_frame().unwrap();
        let b = clock.request_frame().unwrap();
        assert_ne!(a, b);
        assert_eq!(clock.pending(), Some(b));
        assert_eq!(clock.requested(), 2);
    }

    #[test]
    fn fire_takes_pending_once() {
        let mut clock = ManualClock::new();
        let h = clock.request_frame().unwrap();
        assert_eq!(clock.fire(), Some(h));
        assert_eq!(clock.fire(), None);
    }

    #[test]
    fn cancel_only_affects_matching_handle() {
        let mut clock = ManualClock::new();
        let h = clock.request_frame().unwrap();
        clock.cancel_frame(FrameHandle(h.0 + 7));
        assert_eq!(clock.pending(), Some(h));
        clock.cancel_frame(h);
        assert_eq!(clock.pending(), None);
        assert_eq!(clock.cancelled(), 1);
    }
}
