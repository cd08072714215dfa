//! A grid of slightly disordered concentric squares, after Vera Molnár's
//! plotter drawing (Dés)Ordres.
//!
//! Nothing persists between frames except the noise clock: each frame is a
//! pure function of the cell, ring, clock and pointer position. The pointer
//! pulls extra rings into the cells near it.

#[cfg(test)]
#[path = "static_squares_test.rs"]
mod static_squares_test;

use crate::config::StaticParams;
use crate::consts::{INK, PAPER};
use crate::math::{map_range, to_f64};
use crate::noise::NoiseField;
use crate::sketch::{Sketch, SketchKind};
use crate::surface::{Surface, SurfaceResult, isolated};
use crate::vector::Vector2;

/// Rotation and shear applied to one ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingPose {
    /// Radians.
    pub rotation: f64,
    pub shear_x: f64,
    pub shear_y: f64,
}

#[derive(Debug)]
pub struct StaticSquares {
    params: StaticParams,
    width: f64,
    height: f64,
    time: f64,
    pointer: Option<Vector2>,
    noise: NoiseField,
}

impl StaticSquares {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(params: StaticParams, width: u32, height: u32, seed: u64) -> Self {
        Self {
            params,
            width: f64::from(width),
            height: f64::from(height),
            time: 0.0,
            pointer: None,
            noise: NoiseField::new((seed ^ (seed >> 32)) as u32),
        }
    }

    /// Noise clock.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn set_pointer(&mut self, pointer: Option<Vector2>) {
        self.pointer = pointer;
    }

    /// Side of the outermost square of every cell.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        let num = to_f64(self.params.num);
        self.width / num - 2.0 * self.params.margin / num
    }

    fn cell_centre(&self, i: usize, j: usize) -> Vector2 {
        let x = self.cell_size();
        let m = self.params.margin;
        Vector2::new(m + x / 2.0 + x * to_f64(i), m + x / 2.0 + x * to_f64(j))
    }

    fn pointer_inside(&self) -> Option<Vector2> {
        self.pointer
            .filter(|p| p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height)
    }

    /// Highest ring index drawn in cell `(i, j)`.
    #[must_use]
    pub fn ring_count(&self, i: usize, j: usize) -> f64 {
        let p = &self.params;
        match self.pointer_inside() {
            Some(pointer) => {
                let distance = pointer.distance(self.cell_centre(i, j));
                map_range(distance, self.width, 0.0, p.min_rings, p.max_rings).clamp(p.min_rings, p.max_rings)
            }
            None => p.idle_rings,
        }
    }

    /// Side of ring `s` in cell `(i, j)`, or `None` when the ring is skipped:
    /// negative, larger than the cell, or in a row that would cross the
    /// bottom edge.
    #[must_use]
    pub fn ring_side(&self, i: usize, j: usize, s: usize, rings: f64) -> Option<f64> {
        let p = &self.params;
        let x = self.cell_size();
        let t = self.time;
        let jitter = map_range(
            self.noise.noise3(to_f64(i), to_f64(j), to_f64(s) + t),
            0.0,
            1.0,
            -p.r_size / 4.0,
            p.r_size,
        );
        let inset = map_range(to_f64(s), 0.0, rings, 0.0, x) + jitter;
        let side = x - inset;
        let fits_below = p.margin * 1.5 + x + x * to_f64(j) < self.height;
        (side >= 0.0 && side <= x && fits_below).then_some(side)
    }

    #[must_use]
    pub fn ring_pose(&self, i: usize, j: usize, s: usize) -> RingPose {
        let p = &self.params;
        let t = self.time;
        let (fi, fj, fs) = (to_f64(i), to_f64(j), to_f64(s));
        RingPose {
            rotation: map_range(self.noise.noise2(fj + t, fs + t), 0.0, 1.0, -p.r_rotate, p.r_rotate).to_radians(),
            shear_x: map_range(self.noise.noise2(fi, fs + t), 0.0, 1.0, -p.r_shear, p.r_shear),
            shear_y: map_range(self.noise.noise2(fi + t, fs), 0.0, 1.0, -p.r_shear, p.r_shear),
        }
    }

    /// Redraw the whole grid and advance the clock.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn frame(&mut self, surface: &mut dyn Surface) -> SurfaceResult {
        surface.background(PAPER)?;
        surface.set_fill(None);
        surface.set_stroke(INK);
        surface.set_stroke_weight(self.params.line_w);

        let num = self.params.num;
        let x = self.cell_size();
        let grid = x * to_f64(num);
        let offset = if grid < self.height { (self.height - grid) / 2.0 - self.params.margin } else { 0.0 };

        isolated(surface, |surface| {
            surface.translate(0.0, offset)?;
            for i in 0..num {
                for j in 0..num {
                    self.draw_cell(surface, i, j)?;
                }
            }
            Ok(())
        })?;

        self.time += self.params.time_step;
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn draw_cell(&self, surface: &mut dyn Surface, i: usize, j: usize) -> SurfaceResult {
        let rings = self.ring_count(i, j);
        let centre = self.cell_centre(i, j);
        for s in 0..=rings.floor().max(0.0) as usize {
            let Some(side) = self.ring_side(i, j, s, rings) else {
                continue;
            };
            let pose = self.ring_pose(i, j, s);
            isolated(surface, |surface| {
                surface.translate(centre.x, centre.y)?;
                surface.rotate(pose.rotation)?;
                surface.shear_x(pose.shear_x)?;
                surface.shear_y(pose.shear_y)?;
                surface.rect(-side / 2.0, -side / 2.0, side, side)
            })?;
        }
        Ok(())
    }

    /// Track the new size. The clock keeps running.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn resize(&mut self, surface: &mut dyn Surface, width: u32, height: u32) -> SurfaceResult {
        surface.resize(width, height)?;
        self.width = f64::from(width);
        self.height = f64::from(height);
        Ok(())
    }
}

impl Sketch for StaticSquares {
    fn kind(&self) -> SketchKind {
        SketchKind::StaticSquares
    }

    fn setup(&mut self, surface: &mut dyn Surface) -> SurfaceResult {
        surface.background(PAPER)
    }

    fn frame(&mut self, surface: &mut dyn Surface) -> SurfaceResult {
        StaticSquares::frame(self, surface)
    }

    fn resize(&mut self, surface: &mut dyn Surface, width: u32, height: u32) -> SurfaceResult {
        StaticSquares::resize(self, surface, width, height)
    }

    fn pointer_moved(&mut self, position: Option<Vector2>) {
        self.set_pointer(position);
    }
}
