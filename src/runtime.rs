//! Browser runtime: one registry, one animation loop, one retry timer.
//!
//! All state lives in a thread-local slot. Every JS entry point borrows it
//! with `try_borrow_mut`; an event that arrives while a frame is drawing is
//! dropped with a debug log instead of being applied mid-draw.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Interval;
use sketches::{SketchConfig, SketchKind};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

use crate::error::HostError;
use crate::host::Registry;
use crate::retry::RetrySchedule;
use crate::web::{Listener, PointerEvent, WebStage};

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// A self-rescheduling `requestAnimationFrame` loop, cancelled on drop.
struct FrameLoop {
    window: Window,
    callback: FrameCallback,
    handle: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    fn start(window: &Window) -> Self {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));

        let next = Rc::clone(&callback);
        let next_handle = Rc::clone(&handle);
        let next_window = window.clone();
        *callback.borrow_mut() = Some(Closure::new(move |_timestamp: f64| {
            with_runtime("frame", |rt| rt.registry.frame());
            next_handle.set(request_frame(&next_window, &next));
        }));
        handle.set(request_frame(window, &callback));
        Self { window: window.clone(), callback, handle }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(id) = self.handle.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                log::debug!("cancelAnimationFrame failed: {err:?}");
            }
        }
        // Breaks the closure's reference to itself.
        self.callback.borrow_mut().take();
    }
}

fn request_frame(window: &Window, callback: &FrameCallback) -> Option<i32> {
    let slot = callback.borrow();
    let closure = slot.as_ref()?;
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => Some(id),
        Err(err) => {
            log::warn!("requestAnimationFrame failed, animation stopped: {err:?}");
            None
        }
    }
}

struct Runtime {
    window: Window,
    registry: Registry<WebStage>,
    retry: RetrySchedule,
    retry_timer: Option<Interval>,
    frame_loop: Option<FrameLoop>,
    pending: Vec<SketchKind>,
    _resize_listener: Listener,
}

impl Runtime {
    fn new(config: SketchConfig) -> Result<Self, HostError> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let document = window.document().ok_or(HostError::NoDocument)?;
        let stage = WebStage::new(document, Rc::new(dispatch_pointer));
        let seed = sketches::math::seed_from_unit(js_sys::Math::random());
        let resize_listener = Listener::new(window.as_ref(), "resize", |_event| {
            with_runtime("resize", |rt| rt.registry.resize_all());
        })?;
        Ok(Self {
            window,
            registry: Registry::new(stage, config, seed),
            retry: RetrySchedule::default(),
            retry_timer: None,
            frame_loop: None,
            pending: Vec::new(),
            _resize_listener: resize_listener,
        })
    }

    /// One mount pass: bind what is ready, keep the loop and retry timer in
    /// step with the result.
    fn mount_pass(&mut self) {
        let report = self.registry.mount();
        if !self.registry.is_empty() && self.frame_loop.is_none() {
            self.frame_loop = Some(FrameLoop::start(&self.window));
        }
        self.pending = report.pending;
        if self.pending.is_empty() {
            self.retry_timer = None;
        } else if self.retry_timer.is_none() {
            self.retry_timer = Some(Interval::new(self.retry.interval_ms(), retry_tick));
        }
    }

    fn shutdown(mut self) {
        self.retry_timer = None;
        self.frame_loop = None;
        let released = self.registry.unmount();
        log::info!("unmounted {released} sketch(es)");
    }
}

fn retry_tick() {
    with_runtime("retry", |rt| {
        if rt.retry.try_attempt() {
            rt.mount_pass();
        } else {
            log::warn!("giving up on {:?} after {} attempts", rt.pending, rt.retry.attempts());
            rt.retry_timer = None;
        }
    });
}

fn dispatch_pointer(kind: SketchKind, event: PointerEvent) {
    with_runtime("pointer", |rt| match event {
        PointerEvent::Move(at) => {
            rt.registry.pointer_moved(kind, Some(at));
        }
        PointerEvent::Leave => {
            rt.registry.pointer_moved(kind, None);
        }
    });
}

/// Run `f` against the live runtime. Returns `None` when nothing is mounted
/// or the runtime is already borrowed.
fn with_runtime<T>(what: &str, f: impl FnOnce(&mut Runtime) -> T) -> Option<T> {
    RUNTIME.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.as_mut().map(f),
        Err(_) => {
            log::debug!("{what} skipped: runtime busy");
            None
        }
    })
}

// =============================================================
// Entry points
// =============================================================

/// Create the runtime if needed and bind every ready container.
///
/// # Errors
///
/// [`HostError::NoWindow`]/[`HostError::NoDocument`] outside a page, or
/// [`HostError::Context`] when the runtime is busy or a listener fails.
pub fn mount(config: SketchConfig) -> Result<(), HostError> {
    RUNTIME.with(|cell| {
        let mut slot = cell.try_borrow_mut().map_err(|_| HostError::Context("runtime busy".into()))?;
        if slot.is_none() {
            *slot = Some(Runtime::new(config)?);
        } else {
            log::debug!("runtime already live; config ignored");
        }
        if let Some(rt) = slot.as_mut() {
            rt.retry.reset();
            rt.mount_pass();
        }
        Ok(())
    })
}

/// Stop everything and remove every canvas. Safe to call repeatedly.
///
/// # Errors
///
/// [`HostError::Context`] when called from inside a frame.
pub fn unmount() -> Result<(), HostError> {
    let runtime = RUNTIME.with(|cell| {
        cell.try_borrow_mut().map(|mut slot| slot.take()).map_err(|_| HostError::Context("runtime busy".into()))
    })?;
    if let Some(runtime) = runtime {
        runtime.shutdown();
    }
    Ok(())
}

/// Re-measure one container.
///
/// # Errors
///
/// Propagates the registry's resize error.
pub fn resize(container_id: &str) -> Result<bool, HostError> {
    with_runtime("resize", |rt| rt.registry.resize_container(container_id)).unwrap_or(Ok(false))
}

/// Forward a click to the hero sketch.
///
/// # Errors
///
/// Propagates surface failures.
pub fn click(x: f64, y: f64) -> Result<bool, HostError> {
    with_runtime("click", |rt| rt.registry.pointer_click(SketchKind::Hero, x, y)).unwrap_or(Ok(false))
}
