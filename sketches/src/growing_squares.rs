//! Concentric squares drawn by a pen bouncing around inside each cell.
//!
//! A cell's pen runs along the square's edge and turns 90° whenever it has
//! travelled one side length since its last turn. After four turns (one lap)
//! the square shrinks by a random amount, the pen steps inward and the cell
//! picks a fresh rotation and shear. A cell whose side reaches zero is
//! exhausted. In single-pen mode only one cell draws at a time and the
//! active cell advances row by row.

#[cfg(test)]
#[path = "growing_squares_test.rs"]
mod growing_squares_test;

use std::f64::consts::FRAC_PI_2;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::GrowingParams;
use crate::consts::{INK, PAPER};
use crate::math::{to_f64, uniform};
use crate::sketch::{Sketch, SketchKind};
use crate::surface::{Surface, SurfaceResult, isolated};
use crate::vector::Vector2;

/// Turns per lap; the square shrinks once a cell reaches it.
pub const LAP_TURNS: u8 = 4;

/// State of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub side: f64,
    /// Degrees.
    pub rotation: f64,
    pub shear_x: f64,
    pub shear_y: f64,
    pub pen: Vector2,
    pub previous_pen: Vector2,
    /// Pen position at the last turn.
    pub last_turn: Vector2,
    pub turns: u8,
    pub velocity: Vector2,
}

impl Cell {
    fn fresh(side: f64) -> Self {
        let pen = Vector2::new(-side / 2.0, -side / 2.0);
        Self {
            side,
            rotation: 0.0,
            shear_x: 0.0,
            shear_y: 0.0,
            pen,
            previous_pen: pen,
            last_turn: pen,
            turns: 0,
            velocity: Vector2::ZERO,
        }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.side > 0.0
    }

    /// Shrink the square by `shrink` and move the pen half that far inward,
    /// keeping it on the new square's corner.
    pub fn complete_lap(&mut self, shrink: f64) {
        self.side -= shrink;
        self.pen += Vector2::new(shrink / 2.0, shrink / 2.0);
    }

    /// New pose and heading; every anchor snaps to the current pen position.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, params: &GrowingParams, max_size: f64) {
        self.rotation = uniform(rng, -params.r_angle, params.r_angle);
        self.shear_x = uniform(rng, -params.r_shear, params.r_shear);
        self.shear_y = uniform(rng, -params.r_shear, params.r_shear);
        self.previous_pen = self.pen;
        self.last_turn = self.pen;
        self.velocity = Vector2::new(max_size * params.r_vel, 0.0);
        self.turns = 0;
    }

    /// Turn if the pen has covered a side since the last turn, else step.
    fn advance(&mut self) {
        if self.pen.distance(self.last_turn) >= self.side {
            self.velocity = self.velocity.rotated(FRAC_PI_2);
            self.last_turn = self.pen;
            self.turns += 1;
        } else {
            self.previous_pen = self.pen;
            self.pen += self.velocity;
        }
    }
}

#[derive(Debug)]
pub struct GrowingSquares {
    params: GrowingParams,
    width: f64,
    max_size: f64,
    /// Row-major: index = row * num + col.
    cells: Vec<Cell>,
    /// Single-pen scan position; `None` once every cell has been visited.
    cursor: Option<usize>,
    rng: SmallRng,
}

impl GrowingSquares {
    #[must_use]
    pub fn new(params: GrowingParams, width: u32, seed: u64) -> Self {
        let mut sketch = Self {
            params,
            width: f64::from(width),
            max_size: 0.0,
            cells: Vec::new(),
            cursor: None,
            rng: SmallRng::seed_from_u64(seed),
        };
        sketch.reset_cells();
        sketch
    }

    /// Initial side of every cell.
    #[must_use]
    pub fn max_size(&self) -> f64 {
        self.max_size
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col >= self.params.num || row >= self.params.num {
            return None;
        }
        self.cells.get(row * self.params.num + col)
    }

    #[must_use]
    pub fn single_pen(&self) -> bool {
        self.params.single_pen
    }

    /// `(col, row)` of the drawing cell in single-pen mode.
    #[must_use]
    pub fn active_cell(&self) -> Option<(usize, usize)> {
        if !self.params.single_pen {
            return None;
        }
        self.cursor.map(|k| (k % self.params.num, k / self.params.num))
    }

    /// Whether the cell at row-major `index` draws this frame.
    #[must_use]
    pub fn is_active(&self, index: usize) -> bool {
        if self.params.single_pen {
            self.cursor == Some(index) && self.cells.get(index).is_some_and(Cell::is_alive)
        } else {
            self.cells.get(index).is_some_and(Cell::is_alive)
        }
    }

    /// Whether nothing is left to draw.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        if self.params.single_pen {
            self.cursor.is_none()
        } else {
            !self.cells.iter().any(Cell::is_alive)
        }
    }

    fn reset_cells(&mut self) {
        let p = &self.params;
        self.max_size = (self.width - p.margin * 2.0 - p.line_w) / to_f64(p.num);
        let mut cells = vec![Cell::fresh(self.max_size); p.num * p.num];
        for cell in &mut cells {
            cell.randomize(&mut self.rng, &self.params, self.max_size);
        }
        self.cells = cells;
        self.cursor = (self.params.single_pen && !self.cells.is_empty()).then_some(0);
    }

    /// Clear to paper and reset every cell to full size.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn restart(&mut self, surface: &mut dyn Surface) -> SurfaceResult {
        surface.background(PAPER)?;
        self.reset_cells();
        log::debug!("growing squares: restart, max size {:.2}", self.max_size);
        Ok(())
    }

    /// Draw one segment per active cell and advance their pens.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn frame(&mut self, surface: &mut dyn Surface) -> SurfaceResult {
        surface.set_fill(None);
        surface.set_stroke(INK);
        surface.set_stroke_weight(self.params.line_w);

        if self.params.single_pen {
            if let Some(index) = self.cursor {
                if !self.step(surface, index)? {
                    self.cursor = self.next_index(index);
                }
            }
        } else {
            for index in 0..self.cells.len() {
                self.step(surface, index)?;
            }
        }
        Ok(())
    }

    fn next_index(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        if next < self.cells.len() {
            Some(next)
        } else {
            log::debug!("growing squares: scan complete");
            None
        }
    }

    /// Draw and advance one cell. Returns `false` when the cell is exhausted.
    fn step(&mut self, surface: &mut dyn Surface, index: usize) -> SurfaceResult<bool> {
        let num = self.params.num;
        let size = self.max_size;
        let origin = Vector2::new(
            self.params.margin + size * to_f64(index % num) + size / 2.0,
            self.params.margin + size * to_f64(index / num) + size / 2.0,
        );
        let Some(cell) = self.cells.get_mut(index) else {
            return Ok(false);
        };
        if !cell.is_alive() {
            return Ok(false);
        }

        let snapshot = *cell;
        isolated(surface, |surface| {
            surface.translate(origin.x, origin.y)?;
            surface.rotate(snapshot.rotation.to_radians())?;
            surface.shear_x(snapshot.shear_x)?;
            surface.shear_y(snapshot.shear_y)?;
            surface.line(snapshot.previous_pen, snapshot.pen)
        })?;

        if cell.turns == LAP_TURNS {
            let shrink = uniform(&mut self.rng, 0.0, self.params.r_size);
            cell.complete_lap(shrink);
            cell.randomize(&mut self.rng, &self.params, size);
        }
        cell.advance();
        Ok(true)
    }

    /// Resize the surface and restart. Cell size follows the width only.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn resize(&mut self, surface: &mut dyn Surface, width: u32, height: u32) -> SurfaceResult {
        surface.resize(width, height)?;
        self.width = f64::from(width);
        self.restart(surface)
    }
}

impl Sketch for GrowingSquares {
    fn kind(&self) -> SketchKind {
        SketchKind::GrowingSquares
    }

    fn setup(&mut self, surface: &mut dyn Surface) -> SurfaceResult {
        self.restart(surface)
    }

    fn frame(&mut self, surface: &mut dyn Surface) -> SurfaceResult {
        GrowingSquares::frame(self, surface)
    }

    fn resize(&mut self, surface: &mut dyn Surface, width: u32, height: u32) -> SurfaceResult {
        GrowingSquares::resize(self, surface, width, height)
    }
}
