//! Browser backend: the DOM [`Stage`] and a [`Surface`] over
//! [`CanvasRenderingContext2d`].
//!
//! This module is the only place that touches `web_sys`. Canvas calls that
//! can throw are mapped to [`SurfaceError::Backend`]; DOM failures while
//! mounting become [`HostError::Context`].

use std::f64::consts::TAU;
use std::rc::Rc;

use sketches::surface::SurfaceResult;
use sketches::{Rgba, SketchKind, Surface, SurfaceError, Vector2};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, Element, Event, EventTarget, HtmlCanvasElement, MouseEvent};

use crate::error::HostError;
use crate::host::Stage;

/// Pointer input routed from a canvas to the runtime. Clicks arrive only
/// through the exported `onPointerClick` hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move(Vector2),
    Leave,
}

/// Receives pointer input for the sketch bound to a canvas.
pub type PointerHandler = Rc<dyn Fn(SketchKind, PointerEvent)>;

fn js_error(context: &str, err: &JsValue) -> HostError {
    HostError::Context(format!("{context}: {err:?}"))
}

fn backend(err: &JsValue) -> SurfaceError {
    SurfaceError::Backend(format!("{err:?}"))
}

// =============================================================
// Event listeners
// =============================================================

/// An event listener that unregisters itself when dropped.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    /// # Errors
    ///
    /// Returns [`HostError::Context`] when the listener cannot be added.
    pub fn new(target: &EventTarget, event: &'static str, handler: impl FnMut(Event) + 'static) -> Result<Self, HostError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|err| js_error(event, &err))?;
        Ok(Self { target: target.clone(), event, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self.target.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            log::debug!("removing {} listener failed: {err:?}", self.event);
        }
    }
}

fn offset(event: &Event) -> Option<Vector2> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(Vector2::new(f64::from(mouse.offset_x()), f64::from(mouse.offset_y())))
}

// =============================================================
// Stage
// =============================================================

/// Mounts canvases into page containers looked up by id.
pub struct WebStage {
    document: Document,
    on_pointer: PointerHandler,
}

impl WebStage {
    #[must_use]
    pub fn new(document: Document, on_pointer: PointerHandler) -> Self {
        Self { document, on_pointer }
    }

    fn container(&self, kind: SketchKind) -> Result<Element, HostError> {
        self.document
            .get_element_by_id(kind.container_id())
            .ok_or_else(|| HostError::MissingContainer(kind.container_id().to_owned()))
    }

    fn listeners(&self, kind: SketchKind, canvas: &HtmlCanvasElement) -> Result<Vec<Listener>, HostError> {
        let target: &EventTarget = canvas.as_ref();
        let moved = Rc::clone(&self.on_pointer);
        let left = Rc::clone(&self.on_pointer);
        Ok(vec![
            Listener::new(target, "mousemove", move |event| {
                if let Some(at) = offset(&event) {
                    moved(kind, PointerEvent::Move(at));
                }
            })?,
            Listener::new(target, "mouseleave", move |_event| left(kind, PointerEvent::Leave))?,
        ])
    }
}

impl Stage for WebStage {
    type Surface = WebSurface;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn probe(&self, kind: SketchKind) -> Result<(u32, u32), HostError> {
        let rect = self.container(kind)?.get_bounding_client_rect();
        let (width, height) = (rect.width().floor(), rect.height().floor());
        if width < 1.0 || height < 1.0 {
            return Err(HostError::ZeroSizedContainer(kind.container_id().to_owned()));
        }
        Ok((width as u32, height as u32))
    }

    fn create_surface(&mut self, kind: SketchKind, width: u32, height: u32) -> Result<WebSurface, HostError> {
        let container = self.container(kind)?;
        let canvas = self
            .document
            .create_element("canvas")
            .map_err(|err| js_error("create canvas", &err))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| HostError::Context("created element is not a canvas".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);
        canvas
            .set_attribute("style", "display: block;")
            .map_err(|err| js_error("canvas style", &err))?;

        // Collision probes read pixels every frame.
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &JsValue::from_str("willReadFrequently"), &JsValue::TRUE)
            .map_err(|err| js_error("context options", &err))?;
        let ctx = canvas
            .get_context_with_context_options("2d", &options)
            .map_err(|err| js_error("getContext", &err))?
            .ok_or_else(|| HostError::Context("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| HostError::Context("context is not 2d".into()))?;

        container.append_child(&canvas).map_err(|err| js_error("append canvas", &err))?;
        let listeners = self.listeners(kind, &canvas)?;
        let surface = WebSurface { canvas, ctx, width, height, style: Style::default(), stack: Vec::new(), _listeners: listeners };
        surface.apply_style();
        Ok(surface)
    }

    fn release_surface(&mut self, kind: SketchKind, surface: WebSurface) {
        surface.canvas.remove();
        log::debug!("{kind}: canvas removed");
    }

    fn is_attached(&self, surface: &WebSurface) -> bool {
        surface.canvas.is_connected()
    }
}

// =============================================================
// Surface
// =============================================================

/// Draw state mirrored on the Rust side: the canvas forgets its state on
/// resize, and fills are applied per shape.
#[derive(Debug, Clone, Copy)]
struct Style {
    stroke: Rgba,
    weight: f64,
    fill: Option<Rgba>,
}

impl Default for Style {
    fn default() -> Self {
        Self { stroke: Rgba::gray(0), weight: 1.0, fill: None }
    }
}

/// A sketch's `<canvas>` and its 2D context.
pub struct WebSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: u32,
    height: u32,
    style: Style,
    stack: Vec<Style>,
    /// Unregistered when the surface is dropped.
    _listeners: Vec<Listener>,
}

impl WebSurface {
    fn apply_style(&self) {
        self.ctx.set_line_cap("round");
        self.ctx.set_stroke_style_str(&self.style.stroke.css());
        self.ctx.set_line_width(self.style.weight);
    }

    fn fill_current(&self) {
        if let Some(fill) = self.style.fill {
            self.ctx.set_fill_style_str(&fill.css());
            self.ctx.fill();
        }
    }
}

impl Surface for WebSurface {
    fn width(&self) -> f64 {
        f64::from(self.width)
    }

    fn height(&self) -> f64 {
        f64::from(self.height)
    }

    fn resize(&mut self, width: u32, height: u32) -> SurfaceResult {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidSize { width, height });
        }
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.width = width;
        self.height = height;
        self.stack.clear();
        self.style = Style::default();
        self.apply_style();
        Ok(())
    }

    fn background(&mut self, color: Rgba) -> SurfaceResult {
        self.ctx.save();
        let painted = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).map(|()| {
            self.ctx.set_fill_style_str(&color.css());
            self.ctx.fill_rect(0.0, 0.0, self.width(), self.height());
        });
        self.ctx.restore();
        painted.map_err(|err| backend(&err))
    }

    fn set_stroke(&mut self, color: Rgba) {
        self.style.stroke = color;
        self.ctx.set_stroke_style_str(&color.css());
    }

    fn set_stroke_weight(&mut self, weight: f64) {
        self.style.weight = weight;
        self.ctx.set_line_width(weight);
    }

    fn set_fill(&mut self, color: Option<Rgba>) {
        self.style.fill = color;
    }

    fn line(&mut self, from: Vector2, to: Vector2) -> SurfaceResult {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
        Ok(())
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> SurfaceResult {
        self.ctx.begin_path();
        self.ctx.rect(x, y, width, height);
        self.fill_current();
        self.ctx.stroke();
        Ok(())
    }

    fn ellipse(&mut self, cx: f64, cy: f64, width: f64, height: f64) -> SurfaceResult {
        self.ctx.begin_path();
        self.ctx
            .ellipse(cx, cy, width.abs() / 2.0, height.abs() / 2.0, 0.0, 0.0, TAU)
            .map_err(|err| backend(&err))?;
        self.fill_current();
        self.ctx.stroke();
        Ok(())
    }

    fn push(&mut self) {
        self.ctx.save();
        self.stack.push(self.style);
    }

    fn pop(&mut self) {
        self.ctx.restore();
        if let Some(style) = self.stack.pop() {
            self.style = style;
        }
    }

    fn translate(&mut self, x: f64, y: f64) -> SurfaceResult {
        self.ctx.translate(x, y).map_err(|err| backend(&err))
    }

    fn rotate(&mut self, radians: f64) -> SurfaceResult {
        self.ctx.rotate(radians).map_err(|err| backend(&err))
    }

    fn shear_x(&mut self, angle: f64) -> SurfaceResult {
        self.ctx.transform(1.0, 0.0, angle.tan(), 1.0, 0.0, 0.0).map_err(|err| backend(&err))
    }

    fn shear_y(&mut self, angle: f64) -> SurfaceResult {
        self.ctx.transform(1.0, angle.tan(), 0.0, 1.0, 0.0, 0.0).map_err(|err| backend(&err))
    }

    #[allow(clippy::cast_precision_loss)]
    fn pixel(&self, x: i64, y: i64) -> SurfaceResult<Option<Rgba>> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return Ok(None);
        }
        let data = self.ctx.get_image_data(x as f64, y as f64, 1.0, 1.0).map_err(|err| backend(&err))?.data();
        match data.as_slice() {
            [r, g, b, a, ..] => Ok(Some(Rgba::new(*r, *g, *b, *a))),
            _ => Err(SurfaceError::Backend(format!("empty pixel read at ({x}, {y})"))),
        }
    }
}
