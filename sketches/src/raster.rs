//! In-memory RGBA surface.
//!
//! [`Raster`] implements [`Surface`] without anti-aliasing: every pixel a
//! shape touches takes the exact stroke or fill color. That keeps pixel
//! read-back exact, so the hero field's collision sampling behaves the same
//! under test as it does against a real canvas.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use std::f64::consts::PI;

use crate::error::SurfaceError;
use crate::surface::{Rgba, Surface, SurfaceResult};
use crate::vector::Vector2;

/// Color of a freshly created or resized raster.
pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

/// Largest pixel count accepted by [`Raster::new`] and [`Surface::resize`].
const MAX_PIXELS: u64 = 64 * 1024 * 1024;

/// 2D affine matrix in canvas order: `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    #[must_use]
    pub fn translation(x: f64, y: f64) -> Self {
        Self { e: x, f: y, ..Self::IDENTITY }
    }

    #[must_use]
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 }
    }

    #[must_use]
    pub fn shear_x(angle: f64) -> Self {
        Self { c: angle.tan(), ..Self::IDENTITY }
    }

    #[must_use]
    pub fn shear_y(angle: f64) -> Self {
        Self { b: angle.tan(), ..Self::IDENTITY }
    }

    /// `self × rhs`: `rhs` is applied to points first, like `ctx.transform`.
    #[must_use]
    pub fn then(self, rhs: Self) -> Self {
        Self {
            a: self.a * rhs.a + self.c * rhs.b,
            b: self.b * rhs.a + self.d * rhs.b,
            c: self.a * rhs.c + self.c * rhs.d,
            d: self.b * rhs.c + self.d * rhs.d,
            e: self.a * rhs.e + self.c * rhs.f + self.e,
            f: self.b * rhs.e + self.d * rhs.f + self.f,
        }
    }

    #[must_use]
    pub fn apply(self, p: Vector2) -> Vector2 {
        Vector2::new(self.a * p.x + self.c * p.y + self.e, self.b * p.x + self.d * p.y + self.f)
    }

    #[must_use]
    pub fn inverse(self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct DrawState {
    transform: Affine,
    stroke: Rgba,
    stroke_weight: f64,
    fill: Option<Rgba>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            stroke: Rgba::gray(0),
            stroke_weight: 1.0,
            fill: None,
        }
    }
}

/// Exact software raster.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl Raster {
    /// Create a transparent raster.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidSize`] when `width × height` exceeds the
    /// supported pixel count.
    pub fn new(width: u32, height: u32) -> SurfaceResult<Self> {
        Ok(Self {
            width,
            height,
            pixels: allocate(width, height)?,
            state: DrawState::default(),
            stack: Vec::new(),
        })
    }

    #[must_use]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Number of pixels exactly equal to `color`.
    #[must_use]
    pub fn count(&self, color: Rgba) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    /// Row-major RGBA8 bytes, suitable for image encoders.
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| [p.r, p.g, p.b, p.a]).collect()
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn plot(&mut self, x: i64, y: i64, color: Rgba) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color;
        }
    }

    /// Paint a pen tip centred on device point `p`.
    #[allow(clippy::cast_possible_truncation)]
    fn stamp(&mut self, p: Vector2, weight: f64, color: Rgba) {
        let cx = p.x.floor() as i64;
        let cy = p.y.floor() as i64;
        let radius = weight / 2.0;
        if radius < 0.75 {
            self.plot(cx, cy, color);
            return;
        }
        let reach = radius.ceil() as i64;
        let r2 = radius * radius;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                #[allow(clippy::cast_precision_loss)]
                let d2 = (dx * dx + dy * dy) as f64;
                if d2 <= r2 {
                    self.plot(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Stroke a segment given in device coordinates.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn stroke_device(&mut self, from: Vector2, to: Vector2) {
        let color = self.state.stroke;
        let weight = self.state.stroke_weight;
        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as u64;
        for k in 0..=steps {
            #[allow(clippy::cast_precision_loss)]
            let t = k as f64 / steps as f64;
            self.stamp(from + delta * t, weight, color);
        }
    }

    fn stroke_polygon(&mut self, points: &[Vector2]) {
        for (k, &from) in points.iter().enumerate() {
            let to = points[(k + 1) % points.len()];
            self.stroke_device(from, to);
        }
    }

    /// Fill every pixel whose centre maps (through the inverse transform)
    /// into a local-space region accepted by `inside`.
    #[allow(clippy::cast_possible_truncation)]
    fn fill_region(&mut self, device_outline: &[Vector2], color: Rgba, inside: impl Fn(Vector2) -> bool) {
        let Some(inverse) = self.state.transform.inverse() else {
            return;
        };
        let (mut min, mut max) = (Vector2::new(f64::MAX, f64::MAX), Vector2::new(f64::MIN, f64::MIN));
        for p in device_outline {
            min = Vector2::new(min.x.min(p.x), min.y.min(p.y));
            max = Vector2::new(max.x.max(p.x), max.y.max(p.y));
        }
        let x0 = min.x.floor().max(0.0) as i64;
        let y0 = min.y.floor().max(0.0) as i64;
        let x1 = max.x.ceil().min(f64::from(self.width)) as i64;
        let y1 = max.y.ceil().min(f64::from(self.height)) as i64;
        for y in y0..y1 {
            for x in x0..x1 {
                #[allow(clippy::cast_precision_loss)]
                let centre = Vector2::new(x as f64 + 0.5, y as f64 + 0.5);
                if inside(inverse.apply(centre)) {
                    self.plot(x, y, color);
                }
            }
        }
    }

    fn compose(&mut self, m: Affine) {
        self.state.transform = self.state.transform.then(m);
    }
}

fn allocate(width: u32, height: u32) -> SurfaceResult<Vec<Rgba>> {
    let count = u64::from(width) * u64::from(height);
    if count > MAX_PIXELS {
        return Err(SurfaceError::InvalidSize { width, height });
    }
    let len = usize::try_from(count).map_err(|_| SurfaceError::InvalidSize { width, height })?;
    Ok(vec![TRANSPARENT; len])
}

/// Segment count for an ellipse outline given its larger diameter.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ellipse_segments(diameter: f64) -> usize {
    (PI * diameter).ceil().clamp(16.0, 2048.0) as usize
}

impl Surface for Raster {
    fn width(&self) -> f64 {
        f64::from(self.width)
    }

    fn height(&self) -> f64 {
        f64::from(self.height)
    }

    fn resize(&mut self, width: u32, height: u32) -> SurfaceResult {
        self.pixels = allocate(width, height)?;
        self.width = width;
        self.height = height;
        self.state = DrawState::default();
        self.stack.clear();
        Ok(())
    }

    fn background(&mut self, color: Rgba) -> SurfaceResult {
        self.pixels.fill(color);
        Ok(())
    }

    fn set_stroke(&mut self, color: Rgba) {
        self.state.stroke = color;
    }

    fn set_stroke_weight(&mut self, weight: f64) {
        self.state.stroke_weight = weight;
    }

    fn set_fill(&mut self, color: Option<Rgba>) {
        self.state.fill = color;
    }

    fn line(&mut self, from: Vector2, to: Vector2) -> SurfaceResult {
        let m = self.state.transform;
        self.stroke_device(m.apply(from), m.apply(to));
        Ok(())
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> SurfaceResult {
        let m = self.state.transform;
        let corners = [
            m.apply(Vector2::new(x, y)),
            m.apply(Vector2::new(x + width, y)),
            m.apply(Vector2::new(x + width, y + height)),
            m.apply(Vector2::new(x, y + height)),
        ];
        if let Some(fill) = self.state.fill {
            let (lo_x, hi_x) = (x.min(x + width), x.max(x + width));
            let (lo_y, hi_y) = (y.min(y + height), y.max(y + height));
            self.fill_region(&corners, fill, |p| p.x >= lo_x && p.x < hi_x && p.y >= lo_y && p.y < hi_y);
        }
        self.stroke_polygon(&corners);
        Ok(())
    }

    fn ellipse(&mut self, cx: f64, cy: f64, width: f64, height: f64) -> SurfaceResult {
        let (rx, ry) = (width / 2.0, height / 2.0);
        if rx <= 0.0 || ry <= 0.0 {
            return Ok(());
        }
        let m = self.state.transform;
        let segments = ellipse_segments(width.max(height));
        let outline: Vec<Vector2> = (0..segments)
            .map(|k| {
                #[allow(clippy::cast_precision_loss)]
                let theta = 2.0 * PI * k as f64 / segments as f64;
                m.apply(Vector2::new(cx + rx * theta.cos(), cy + ry * theta.sin()))
            })
            .collect();
        if let Some(fill) = self.state.fill {
            self.fill_region(&outline, fill, |p| {
                let u = (p.x - cx) / rx;
                let v = (p.y - cy) / ry;
                u * u + v * v <= 1.0
            });
        }
        self.stroke_polygon(&outline);
        Ok(())
    }

    fn push(&mut self) {
        self.stack.push(self.state);
    }

    fn pop(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f64, y: f64) -> SurfaceResult {
        self.compose(Affine::translation(x, y));
        Ok(())
    }

    fn rotate(&mut self, radians: f64) -> SurfaceResult {
        self.compose(Affine::rotation(radians));
        Ok(())
    }

    fn shear_x(&mut self, angle: f64) -> SurfaceResult {
        self.compose(Affine::shear_x(angle));
        Ok(())
    }

    fn shear_y(&mut self, angle: f64) -> SurfaceResult {
        self.compose(Affine::shear_y(angle));
        Ok(())
    }

    fn pixel(&self, x: i64, y: i64) -> SurfaceResult<Option<Rgba>> {
        Ok(self.index(x, y).map(|idx| self.pixels[idx]))
    }
}
