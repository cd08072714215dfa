//! Drawing capability consumed by every sketch.
//!
//! The trait mirrors the subset of an immediate-mode 2D canvas the sketches
//! need: stroke/fill state, an affine transform stack, primitive shapes and a
//! synchronous pixel read-back. Shapes are stroked with the current stroke
//! color and weight, and filled only when a fill is set.

use crate::error::SurfaceError;
use crate::vector::Vector2;

/// Result alias for surface operations.
pub type SurfaceResult<T = ()> = Result<T, SurfaceError>;

/// An 8-bit RGBA color. Equality is exact, which collision detection relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray with all channels set to `level`.
    #[must_use]
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level, 255)
    }

    /// CSS color string, e.g. `rgba(12, 12, 12, 1)`.
    #[must_use]
    pub fn css(self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, f64::from(self.a) / 255.0)
    }
}

/// A 2D drawing target.
///
/// Coordinates are in surface pixels with the origin top-left and y pointing
/// down. Transform calls compose onto the current matrix; `push`/`pop` save
/// and restore it together with the stroke and fill state.
pub trait Surface {
    /// Current width in pixels.
    fn width(&self) -> f64;

    /// Current height in pixels.
    fn height(&self) -> f64;

    /// Resize the backing buffer. Contents after a resize are unspecified.
    fn resize(&mut self, width: u32, height: u32) -> SurfaceResult;

    /// Fill the whole surface with `color`, ignoring the current transform.
    fn background(&mut self, color: Rgba) -> SurfaceResult;

    fn set_stroke(&mut self, color: Rgba);

    fn set_stroke_weight(&mut self, weight: f64);

    /// Set the fill color; `None` disables filling.
    fn set_fill(&mut self, color: Option<Rgba>);

    fn line(&mut self, from: Vector2, to: Vector2) -> SurfaceResult;

    /// Axis-aligned (before transform) rectangle with top-left corner `(x, y)`.
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> SurfaceResult;

    /// Ellipse centred at `(cx, cy)` with the given diameters.
    fn ellipse(&mut self, cx: f64, cy: f64, width: f64, height: f64) -> SurfaceResult;

    fn push(&mut self);

    fn pop(&mut self);

    fn translate(&mut self, x: f64, y: f64) -> SurfaceResult;

    fn rotate(&mut self, radians: f64) -> SurfaceResult;

    /// Shear along x by `angle` radians (x' = x + tan(angle)·y).
    fn shear_x(&mut self, angle: f64) -> SurfaceResult;

    /// Shear along y by `angle` radians (y' = y + tan(angle)·x).
    fn shear_y(&mut self, angle: f64) -> SurfaceResult;

    /// Color of the pixel at `(x, y)`, or `None` when outside the surface.
    fn pixel(&self, x: i64, y: i64) -> SurfaceResult<Option<Rgba>>;
}

/// Run `draw` between [`Surface::push`] and [`Surface::pop`], popping even
/// when `draw` fails.
///
/// # Errors
///
/// Returns whatever `draw` returns.
pub fn isolated<S: Surface + ?Sized>(surface: &mut S, draw: impl FnOnce(&mut S) -> SurfaceResult) -> SurfaceResult {
    surface.push();
    let result = draw(surface);
    surface.pop();
    result
}
