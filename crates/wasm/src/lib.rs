//! Browser host for plexus.
//!
//! Paints through a canvas 2D context and paces the scheduler with
//! `requestAnimationFrame`. JS usage:
//!
//! ```js
//! const plexus = new PlexusCanvas(42n, "{}");
//! plexus.start("particles");
//! // ...
//! plexus.stop();
//! ```

use glam::DVec2;
use plexus_core::{
    FieldConfig, FrameClock, FrameHandle, PlexusError, Rgba, Scheduler, Surface,
};
use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

type SharedScheduler = Rc<RefCell<Scheduler<CanvasSurface, AnimationFrameClock>>>;

/// Rounds a surface dimension to a canvas attribute value.
fn canvas_extent(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

fn viewport(window: &Window) -> (f64, f64) {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (dim(window.inner_width()), dim(window.inner_height()))
}

/// A `<canvas>` element and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Looks up a canvas by element id. `None` if it is missing, is not a
    /// canvas, or has no 2D context.
    pub fn from_element_id(document: &Document, id: &str) -> Option<Self> {
        let canvas = document
            .get_element_by_id(id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f64 {
        f64::from(self.canvas.width())
    }

    fn height(&self) -> f64 {
        f64::from(self.canvas.height())
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(canvas_extent(width));
        self.canvas.set_height(canvas_extent(height));
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width(), self.height());
    }

    fn fill_disc(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.ctx.begin_path();
        if self.ctx.arc(center.x, center.y, radius, 0.0, TAU).is_ok() {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill();
        }
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }
}

/// `requestAnimationFrame` as a [`FrameClock`].
///
/// Every request schedules the same callback; `fired` records the handle of
/// the outstanding request so the callback can hand it to the scheduler.
pub struct AnimationFrameClock {
    window: Window,
    callback: Closure<dyn FnMut(f64)>,
    fired: Rc<Cell<Option<FrameHandle>>>,
}

impl FrameClock for AnimationFrameClock {
    fn request_frame(&mut self) -> Result<FrameHandle, PlexusError> {
        let id = self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
            .map_err(|e| PlexusError::FrameRequest(format!("{e:?}")))?;
        let handle = FrameHandle(u64::from(id as u32));
        self.fired.set(Some(handle));
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.window.cancel_animation_frame(handle.0 as u32 as i32).is_err() {
            log::warn!("cancelAnimationFrame failed for {handle:?}");
        }
        if self.fired.get() == Some(handle) {
            self.fired.set(None);
        }
    }
}

/// The window `resize` listener, attached while a session runs.
struct ResizeListener {
    window: Window,
    callback: Closure<dyn FnMut()>,
}

impl ResizeListener {
    fn attach(window: Window, callback: Closure<dyn FnMut()>) -> Result<Self, JsError> {
        window
            .add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
            .map_err(|e| JsError::new(&format!("{e:?}")))?;
        Ok(Self { window, callback })
    }

    fn detach(self) {
        if self
            .window
            .remove_event_listener_with_callback("resize", self.callback.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("failed to remove resize listener");
        }
    }
}

/// Shared between the handle and the frame callback so either can detach.
type ListenerSlot = Rc<RefCell<Option<ResizeListener>>>;

fn detach_resize(slot: &ListenerSlot) {
    let listener = slot.borrow_mut().take();
    if let Some(listener) = listener {
        listener.detach();
    }
}

/// Hands a fired frame to the scheduler. Runs `on_stop` if delivering it
/// stopped the session.
fn deliver_frame<S: Surface, C: FrameClock>(
    scheduler: &mut Scheduler<S, C>,
    handle: FrameHandle,
    on_stop: impl FnOnce(),
) {
    if let Err(e) = scheduler.on_frame(handle) {
        log::error!("animation stopped: {e}");
        on_stop();
    }
}

fn frame_callback(
    scheduler: Weak<RefCell<Scheduler<CanvasSurface, AnimationFrameClock>>>,
    fired: Rc<Cell<Option<FrameHandle>>>,
    resize: ListenerSlot,
) -> Closure<dyn FnMut(f64)> {
    Closure::new(move |_timestamp: f64| {
        let (Some(scheduler), Some(handle)) = (scheduler.upgrade(), fired.take()) else {
            return;
        };
        let Ok(mut scheduler) = scheduler.try_borrow_mut() else {
            log::warn!("frame {handle:?} fired while the scheduler was busy");
            return;
        };
        deliver_frame(&mut *scheduler, handle, || detach_resize(&resize));
    })
}

/// A particle field painted on a page canvas.
#[wasm_bindgen]
pub struct PlexusCanvas {
    scheduler: SharedScheduler,
    resize: ListenerSlot,
}

#[wasm_bindgen]
impl PlexusCanvas {
    /// Creates an unstarted session. `params` is a JSON object of
    /// [`FieldConfig`] overrides (`"{}"` for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, params: &str) -> Result<PlexusCanvas, JsError> {
        let params: serde_json::Value = serde_json::from_str(params)?;
        let config = FieldConfig::from_json(&params)?;
        Ok(Self {
            scheduler: Rc::new(RefCell::new(Scheduler::new(config, seed))),
            resize: Rc::new(RefCell::new(None)),
        })
    }

    /// Sizes the canvas to the viewport, paints the first frame and starts
    /// the animation loop. Also follows window resizes until [`stop`](Self::stop)
    /// or until the animation stops on its own.
    pub fn start(&mut self, canvas_id: &str) -> Result<(), JsError> {
        let window = web_sys::window();
        let surface = window
            .as_ref()
            .and_then(Window::document)
            .and_then(|doc| CanvasSurface::from_element_id(&doc, canvas_id));
        let fired = Rc::new(Cell::new(None));
        let clock = window.clone().map(|window| AnimationFrameClock {
            window,
            callback: frame_callback(
                Rc::downgrade(&self.scheduler),
                fired.clone(),
                self.resize.clone(),
            ),
            fired,
        });
        let (vw, vh) = window.as_ref().map(viewport).unwrap_or_default();
        self.scheduler.borrow_mut().start(surface, clock, vw, vh)?;

        if let Some(window) = window {
            let scheduler = Rc::downgrade(&self.scheduler);
            let resize_window = window.clone();
            let on_resize = Closure::<dyn FnMut()>::new(move || {
                let Some(scheduler) = scheduler.upgrade() else {
                    return;
                };
                let (vw, vh) = viewport(&resize_window);
                if let Err(e) = scheduler.borrow_mut().resize(vw, vh) {
                    log::debug!("resize ignored: {e}");
                }
            });
            let listener = ResizeListener::attach(window, on_resize)?;
            *self.resize.borrow_mut() = Some(listener);
        }
        Ok(())
    }

    /// Stops the animation and detaches the resize listener. Idempotent.
    pub fn stop(&mut self) {
        detach_resize(&self.resize);
        if let Ok(mut scheduler) = self.scheduler.try_borrow_mut() {
            scheduler.teardown();
        }
    }

    /// Lifecycle state: `"uninitialized"`, `"running"` or `"stopped"`.
    pub fn state(&self) -> String {
        self.scheduler.borrow().state().name().to_string()
    }

    /// Ticks run so far in the current session.
    pub fn ticks(&self) -> f64 {
        self.scheduler.borrow().ticks() as f64
    }
}

impl Drop for PlexusCanvas {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plexus_core::{DisplayList, ManualClock, SchedulerState};

    /// Grants the first request, fails every later one.
    struct OneShotClock {
        issued: bool,
    }

    impl FrameClock for OneShotClock {
        fn request_frame(&mut self) -> Result<FrameHandle, PlexusError> {
            if self.issued {
                return Err(PlexusError::FrameRequest("window closed".into()));
            }
            self.issued = true;
            Ok(FrameHandle(1))
        }

        fn cancel_frame(&mut self, _handle: FrameHandle) {}
    }

    #[test]
    fn failed_frame_request_runs_stop_hook() {
        let mut scheduler: Scheduler<DisplayList, OneShotClock> =
            Scheduler::new(FieldConfig::default(), 3);
        scheduler
            .start(
                Some(DisplayList::default()),
                Some(OneShotClock { issued: false }),
                800.0,
                600.0,
            )
            .unwrap();
        let handle = scheduler.pending().unwrap();
        let mut stopped = false;
        deliver_frame(&mut scheduler, handle, || stopped = true);
        assert!(stopped);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
    }

    #[test]
    fn delivered_frame_keeps_listener() {
        let mut scheduler: Scheduler<DisplayList, ManualClock> =
            Scheduler::new(FieldConfig::default(), 3);
        scheduler
            .start(Some(DisplayList::default()), Some(ManualClock::new()), 800.0, 600.0)
            .unwrap();
        let handle = scheduler.clock_mut().and_then(ManualClock::fire).unwrap();
        let mut stopped = false;
        deliver_frame(&mut scheduler, handle, || stopped = true);
        assert!(!stopped);
        assert_eq!(scheduler.ticks(), 2);
    }

    #[test]
    fn detaching_empty_slot_is_noop() {
        let slot: ListenerSlot = Rc::new(RefCell::new(None));
        detach_resize(&slot);
        assert!(slot.borrow().is_none());
    }

    #[test]
    fn canvas_extent_rounds() {
        assert_eq!(canvas_extent(799.6), 800);
        assert_eq!(canvas_extent(3000.0), 3000);
    }

    #[test]
    fn canvas_extent_degenerate_is_zero() {
        assert_eq!(canvas_extent(-4.0), 0);
        assert_eq!(canvas_extent(f64::NAN), 0);
        assert_eq!(canvas_extent(f64::INFINITY), 0);
    }
}
