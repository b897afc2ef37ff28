//! Session lifecycle: drives simulate → paint once per refresh.
//!
//! The [`Scheduler`] exclusively owns the session (field, simulator,
//! renderer), the drawable surface and the frame clock. It never loops on its
//! own: each fired frame request is delivered through
//! [`Scheduler::on_frame`], which runs one tick to completion and submits the
//! next request. Teardown cancels the outstanding request, and any late
//! callback sees a stopped scheduler and does nothing.
//!
//! ```text
//! Uninitialized --start--> Running --on_frame--> Running --teardown--> Stopped
//! ```

use crate::clock::{FrameClock, FrameHandle};
use crate::config::FieldConfig;
use crate::error::PlexusError;
use crate::field::Field;
use crate::prng::Xorshift64;
use crate::renderer::Renderer;
use crate::simulator::Simulator;
use crate::surface::Surface;

/// Lifecycle state. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Uninitialized,
    Running,
    Stopped,
}

impl SchedulerState {
    /// Returns the lowercase state name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            SchedulerState::Uninitialized => "uninitialized",
            SchedulerState::Running => "running",
            SchedulerState::Stopped => "stopped",
        }
    }
}

/// Everything a running animation owns besides its host resources.
#[derive(Debug, Clone)]
pub struct Session {
    field: Field,
    simulator: Simulator,
    renderer: Renderer,
    ticks: u64,
}

impl Session {
    /// Wraps a generated field with the simulator and renderer for `config`.
    pub fn new(field: Field, config: &FieldConfig) -> Self {
        Self {
            field,
            simulator: Simulator::from_config(config),
            renderer: Renderer::from_config(config),
            ticks: 0,
        }
    }

    /// Returns the session's field.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// One tick: advance the field, then paint it.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.simulator.advance(&mut self.field);
        self.renderer.paint(&self.field, surface);
        self.ticks += 1;
    }
}

/// Owns a session and paces it with a [`FrameClock`].
pub struct Scheduler<S, C> {
    config: FieldConfig,
    seed: u64,
    state: SchedulerState,
    surface: Option<S>,
    clock: Option<C>,
    session: Option<Session>,
    pending: Option<FrameHandle>,
}

impl<S: Surface, C: FrameClock> Scheduler<S, C> {
    /// Creates an uninitialized scheduler. Nothing is allocated until `start`.
    pub fn new(config: FieldConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            state: SchedulerState::Uninitialized,
            surface: None,
            clock: None,
            session: None,
            pending: None,
        }
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Returns the running session, or `None` before start and after teardown.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The live field, or `None` before start and after teardown.
    pub fn field(&self) -> Option<&Field> {
        self.session.as_ref().map(Session::field)
    }

    /// Returns the ticks run in the current session (0 when none is live).
    pub fn ticks(&self) -> u64 {
        self.session.as_ref().map_or(0, Session::ticks)
    }

    /// Returns the drawable surface once started.
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Returns the frame clock once started.
    pub fn clock(&self) -> Option<&C> {
        self.clock.as_ref()
    }

    /// Returns the frame clock mutably, for hosts that pump it.
    pub fn clock_mut(&mut self) -> Option<&mut C> {
        self.clock.as_mut()
    }

    /// The outstanding frame request, if any.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Surface size for a viewport: full width, `height_multiplier` times the height.
    pub fn surface_size(&self, viewport_width: f64, viewport_height: f64) -> (f64, f64) {
        (
            viewport_width,
            viewport_height * self.config.height_multiplier,
        )
    }

    /// Starts the session.
    ///
    /// Fails without changing state if the host has no surface
    /// (`SurfaceUnavailable`) or no frame clock (`ClockUnavailable`), if the
    /// config is invalid, if the sized surface is degenerate, or if the first
    /// frame request fails. On success the first frame is painted immediately
    /// and the next one is requested.
    pub fn start(
        &mut self,
        surface: Option<S>,
        clock: Option<C>,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Result<(), PlexusError> {
        self.expect_state(SchedulerState::Uninitialized, "start")?;
        let mut surface = surface.ok_or(PlexusError::SurfaceUnavailable)?;
        let mut clock = clock.ok_or(PlexusError::ClockUnavailable)?;
        self.config.validate()?;

        let (width, height) = self.surface_size(viewport_width, viewport_height);
        surface.resize(width, height);
        let field = Field::generate(
            surface.width(),
            surface.height(),
            &self.config,
            &mut Xorshift64::new(self.seed),
        )?;
        let mut session = Session::new(field, &self.config);
        let handle = clock.request_frame()?;
        session.tick(&mut surface);

        log::info!(
            "started {} particles on {}x{} surface (seed {})",
            session.field().len(),
            surface.width(),
            surface.height(),
            self.seed
        );
        self.surface = Some(surface);
        self.clock = Some(clock);
        self.session = Some(session);
        self.pending = Some(handle);
        self.state = SchedulerState::Running;
        Ok(())
    }

    /// Delivers a fired frame request.
    ///
    /// Returns `Ok(true)` if a tick ran. Callbacks arriving when not running,
    /// or carrying a handle other than the pending one, are ignored. If the
    /// next frame cannot be requested the scheduler stops and returns the
    /// error.
    pub fn on_frame(&mut self, handle: FrameHandle) -> Result<bool, PlexusError> {
        if self.state != SchedulerState::Running {
            log::trace!("ignoring frame {handle:?}: scheduler {}", self.state.name());
            return Ok(false);
        }
        if self.pending != Some(handle) {
            log::trace!("ignoring stale frame {handle:?}, pending {:?}", self.pending);
            return Ok(false);
        }
        self.pending = None;
        let (Some(session), Some(surface), Some(clock)) = (
            self.session.as_mut(),
            self.surface.as_mut(),
            self.clock.as_mut(),
        ) else {
            return Ok(false);
        };
        session.tick(surface);
        match clock.request_frame() {
            Ok(next) => {
                self.pending = Some(next);
                Ok(true)
            }
            Err(e) => {
                log::error!("stopping animation: {e}");
                self.teardown();
                Err(e)
            }
        }
    }

    /// Adapts to a new viewport size.
    ///
    /// Resizes the surface and records its new size as the field bounds.
    /// Particles keep their positions; any now outside the bounds return on
    /// their next wrap.
    pub fn resize(&mut self, viewport_width: f64, viewport_height: f64) -> Result<(), PlexusError> {
        self.expect_state(SchedulerState::Running, "resize")?;
        let (width, height) = self.surface_size(viewport_width, viewport_height);
        if let (Some(surface), Some(session)) = (self.surface.as_mut(), self.session.as_mut()) {
            surface.resize(width, height);
            session.field.set_bounds(surface.width(), surface.height());
            log::debug!("resized surface to {}x{}", surface.width(), surface.height());
        }
        Ok(())
    }

    /// Stops the session: cancels the pending frame and releases the field.
    ///
    /// Safe to call in any state; the scheduler ends `Stopped`.
    pub fn teardown(&mut self) {
        if let (Some(handle), Some(clock)) = (self.pending.take(), self.clock.as_mut()) {
            clock.cancel_frame(handle);
        }
        if let Some(session) = self.session.take() {
            log::info!("stopped after {} ticks", session.ticks());
        }
        self.state = SchedulerState::Stopped;
    }

    fn expect_state(&self, expected: SchedulerState, action: &'static str) -> Result<(), PlexusError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(PlexusError::InvalidTransition {
                state: self.state.name(),
                action,
            })
        }
    }
}
