//! Hero field: a grid of pens that steer by reading back the canvas.
//!
//! Every pen draws the segment it travelled last frame, then looks two
//! detector steps ahead. If either sample is not background the pen turns 45°,
//! clockwise on even rows and counter-clockwise on odd rows, which makes the
//! trails fold into each other instead of bouncing at random. A click cycles
//! through six starting layouts.

#[cfg(test)]
#[path = "hero_test.rs"]
mod hero_test;

use std::f64::consts::TAU;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::HeroParams;
use crate::consts::{EIGHTH_TURN, HERO_BACKGROUND, HERO_BORDER_INK};
use crate::math::{map_range, to_f64, uniform};
use crate::sketch::{Sketch, SketchKind};
use crate::surface::{Rgba, Surface, SurfaceResult};
use crate::vector::Vector2;

/// Number of cumulative detector steps sampled ahead of each pen.
pub const PROBE_STEPS: usize = 2;

/// Number of compass directions a pen can start in.
const START_DIRECTIONS: u8 = 8;

/// Starting arrangement of the pens, cycled by clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Uniformly scattered; checkerboard decoration.
    Scatter,
    /// On the four edges by row quartile; circle decoration.
    Edges,
    /// Regular grid inset to the middle three fifths; frame and circle.
    Grid,
    /// On a centred circle; frame and circle.
    Circle,
    /// Diagonal sweep from two linear maps; frame.
    Diagonal,
    /// Horizontal sine band; frame.
    Wave,
}

impl Layout {
    /// Highest layout index; clicking past it wraps to 0.
    pub const MAX: u8 = 5;

    /// Layout for `index`, wrapping modulo `MAX + 1`.
    #[must_use]
    pub fn from_index(index: u8) -> Self {
        match index % (Self::MAX + 1) {
            0 => Self::Scatter,
            1 => Self::Edges,
            2 => Self::Grid,
            3 => Self::Circle,
            4 => Self::Diagonal,
            _ => Self::Wave,
        }
    }

    #[must_use]
    pub fn index(self) -> u8 {
        match self {
            Self::Scatter => 0,
            Self::Edges => 1,
            Self::Grid => 2,
            Self::Circle => 3,
            Self::Diagonal => 4,
            Self::Wave => 5,
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    fn has_frame(self) -> bool {
        self.index() > 1
    }

    fn has_circle(self) -> bool {
        matches!(self, Self::Edges | Self::Grid | Self::Circle)
    }
}

/// One drawing agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub position: Vector2,
    /// Start of this frame's trail segment: `position` as of the previous frame.
    pub previous: Vector2,
    /// Look-ahead scratch point, rebuilt every frame.
    pub probe: Vector2,
    pub velocity: Vector2,
    /// Gray level in `[127, 255)`.
    pub color: u8,
    /// Grid row; its parity picks the steering handedness.
    pub row: usize,
}

/// New velocity after one frame's steering decision.
///
/// A collision turns even rows +45° and odd rows −45°; a spontaneous turn goes
/// the opposite way. Collisions take precedence.
#[must_use]
pub fn steer(velocity: Vector2, row: usize, collided: bool, spontaneous: bool) -> Vector2 {
    let handed = if row % 2 == 0 { EIGHTH_TURN } else { -EIGHTH_TURN };
    if collided {
        velocity.rotated(handed)
    } else if spontaneous {
        velocity.rotated(-handed)
    } else {
        velocity
    }
}

/// The hero sketch state.
#[derive(Debug)]
pub struct HeroField {
    params: HeroParams,
    width: f64,
    height: f64,
    ratio: f64,
    radius: f64,
    layout: Layout,
    pens: Vec<Pen>,
    rng: SmallRng,
}

impl HeroField {
    /// Create an unplaced field; pens are placed by [`HeroField::start_positions`].
    #[must_use]
    pub fn new(params: HeroParams, width: u32, height: u32, seed: u64) -> Self {
        let layout = Layout::from_index(params.initial_layout);
        let mut field = Self {
            params,
            width: 0.0,
            height: 0.0,
            ratio: 1.0,
            radius: 0.0,
            layout,
            pens: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
        };
        field.set_size(width, height);
        field
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[must_use]
    pub fn pens(&self) -> &[Pen] {
        &self.pens
    }

    /// Diameter of the circular decoration.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = f64::from(width);
        self.height = f64::from(height);
        self.ratio = self.width / self.height;
    }

    /// The dimension that bounds circular layouts.
    fn limiting(&self) -> f64 {
        if self.ratio > 1.0 { self.height } else { self.width }
    }

    /// Clear the surface and place every pen according to the current layout.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn start_positions(&mut self, surface: &mut dyn Surface) -> SurfaceResult {
        surface.background(HERO_BACKGROUND)?;
        self.radius = self.limiting() / 2.0;

        let num = self.params.num;
        let mut pens = Vec::with_capacity(num * num);
        for i in 0..num {
            for j in 0..num {
                let position = self.place(i, j);
                let speed = uniform(&mut self.rng, self.params.r_vel / 2.0, self.params.r_vel);
                let heading = f64::from(self.rng.random_range(0..START_DIRECTIONS)) * EIGHTH_TURN;
                let velocity = Vector2::new(0.0, 1.0).with_magnitude(speed).rotated(heading);
                pens.push(Pen {
                    position,
                    previous: position,
                    probe: position,
                    velocity,
                    color: gray_level(uniform(&mut self.rng, 127.0, 255.0)),
                    row: i,
                });
            }
        }
        self.pens = pens;
        log::debug!("hero: placed {} pens in {:?}", self.pens.len(), self.layout);
        Ok(())
    }

    /// Starting point for the pen at row `i`, column `j`, clamped onto the canvas.
    fn place(&mut self, i: usize, j: usize) -> Vector2 {
        let (w, h) = (self.width, self.height);
        let n = to_f64(self.params.num);
        let (fi, fj) = (to_f64(i), to_f64(j));
        let lim = self.limiting();

        let raw = match self.layout {
            Layout::Scatter => Vector2::new(uniform(&mut self.rng, 0.0, w), uniform(&mut self.rng, 0.0, h)),
            Layout::Edges => {
                let quarter = n / 4.0;
                if fi < quarter {
                    Vector2::new(0.0, uniform(&mut self.rng, 0.0, h))
                } else if fi < quarter * 2.0 {
                    Vector2::new(uniform(&mut self.rng, 0.0, w), 0.0)
                } else if fi < quarter * 3.0 {
                    Vector2::new(w - 1.0, uniform(&mut self.rng, 0.0, h))
                } else {
                    Vector2::new(uniform(&mut self.rng, 0.0, w), h - 1.0)
                }
            }
            Layout::Grid => Vector2::new(
                map_range(fi, 0.0, n, w / 5.0, w - w / 5.0),
                map_range(fj, 0.0, n, h / 5.0, h - h / 5.0),
            ),
            Layout::Circle => {
                // The column shifts the start of the angular sweep.
                let angle = map_range(fi, 0.0, n, fj, TAU);
                Vector2::new(w / 2.0 + angle.sin() * lim / 3.0, h / 2.0 + angle.cos() * lim / 3.0)
            }
            Layout::Diagonal => Vector2::new(map_range(fi, fj, n, 0.0, w), map_range(fi, fj, n, 0.0, h)),
            Layout::Wave => Vector2::new(
                map_range(fi, fj, n, 0.0, w),
                h / 2.0 + map_range(fi, fj, n, 0.0, TAU * 2.0).cos() * lim / 3.0,
            ),
        };
        Vector2::new(raw.x.clamp(0.0, (w - 1.0).max(0.0)), raw.y.clamp(0.0, (h - 1.0).max(0.0)))
    }

    /// Stroke the layout's decoration in the current stroke color.
    fn border(&self, surface: &mut dyn Surface) -> SurfaceResult {
        let (w, h) = (self.width, self.height);
        surface.set_fill(None);
        surface.set_stroke_weight(5.0);
        if self.layout.has_frame() {
            surface.rect(0.0, 0.0, w - 1.0, h - 1.0)?;
        }
        surface.set_stroke_weight(3.0);
        if self.layout.has_circle() {
            surface.ellipse(w / 2.0, h / 2.0, self.radius, self.radius)?;
        }
        if self.layout == Layout::Scatter {
            let side = h / 8.0;
            if side > 0.0 {
                let mut x = 0.0;
                while x < w {
                    let mut y = 0.0;
                    while y < h {
                        surface.rect(x, y, side, side)?;
                        y += side;
                    }
                    x += side;
                }
            }
        }
        Ok(())
    }

    /// Draw one frame and move every pen.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn frame(&mut self, surface: &mut dyn Surface) -> SurfaceResult {
        surface.set_stroke(HERO_BORDER_INK);
        self.border(surface)?;
        surface.set_stroke_weight(self.params.line_w);

        let reach = self.params.line_w + 1.0;
        let r_obst = self.params.r_obst;
        for pen in &mut self.pens {
            surface.set_stroke(Rgba::gray(pen.color));
            surface.line(pen.previous, pen.position)?;
            pen.previous = pen.position;
            pen.probe = pen.position;

            let detector = pen.velocity.with_magnitude(reach);
            let mut collided = false;
            // Cumulative: the second sample sits two detector steps ahead.
            for _ in 0..PROBE_STEPS {
                pen.probe += detector;
                if is_obstacle(surface, pen.probe)? {
                    collided = true;
                }
            }

            let spontaneous = !collided && self.rng.random::<f64>() > r_obst;
            pen.velocity = steer(pen.velocity, pen.row, collided, spontaneous);
            pen.position += pen.velocity;
        }

        surface.set_stroke(HERO_BACKGROUND);
        self.border(surface)
    }

    /// Advance the layout and restart, if the click lands strictly inside the canvas.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn click(&mut self, surface: &mut dyn Surface, x: f64, y: f64) -> SurfaceResult<bool> {
        if !(x > 0.0 && x < self.width && y > 0.0 && y < self.height) {
            return Ok(false);
        }
        self.layout = self.layout.next();
        self.start_positions(surface)?;
        Ok(true)
    }

    /// Resize the surface and restart from scratch.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn resize(&mut self, surface: &mut dyn Surface, width: u32, height: u32) -> SurfaceResult {
        surface.resize(width, height)?;
        self.set_size(width, height);
        self.start_positions(surface)
    }
}

/// Whether the pixel under `probe` is anything but background. Points off the
/// surface read as background.
#[allow(clippy::cast_possible_truncation)]
fn is_obstacle(surface: &dyn Surface, probe: Vector2) -> SurfaceResult<bool> {
    let sample = surface.pixel(probe.x.trunc() as i64, probe.y.trunc() as i64)?;
    Ok(sample.is_some_and(|color| color != HERO_BACKGROUND))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn gray_level(value: f64) -> u8 {
    value.floor().clamp(0.0, 255.0) as u8
}

impl Sketch for HeroField {
    fn kind(&self) -> SketchKind {
        SketchKind::Hero
    }

    fn setup(&mut self, surface: &mut dyn Surface) -> SurfaceResult {
        self.start_positions(surface)
    }

    fn frame(&mut self, surface: &mut dyn Surface) -> SurfaceResult {
        HeroField::frame(self, surface)
    }

    fn resize(&mut self, surface: &mut dyn Surface, width: u32, height: u32) -> SurfaceResult {
        HeroField::resize(self, surface, width, height)
    }

    fn pointer_click(&mut self, surface: &mut dyn Surface, x: f64, y: f64) -> SurfaceResult<bool> {
        self.click(surface, x, y)
    }
}
