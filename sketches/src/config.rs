//! Tuning parameters for the three sketches.
//!
//! Every struct is `#[serde(default)]`, so a host page can pass a partial JSON
//! object (or nothing at all) and get the stock look.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration handed to every sketch at construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Seed for random and noise sources. `None` lets the host pick one.
    pub seed: Option<u64>,
    pub hero: HeroParams,
    pub static_squares: StaticParams,
    pub growing: GrowingParams,
}

impl SketchConfig {
    /// Parse a JSON config. Missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] when `json` is malformed or a field has
    /// the wrong type.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Hero pen field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroParams {
    /// Pens per side of the grid.
    pub num: usize,
    /// Layout shown on first mount.
    pub initial_layout: u8,
    /// Pen trail weight; the collision probe steps `line_w + 1` pixels.
    pub line_w: f64,
    /// Maximum pen speed in pixels per frame; speeds are drawn from `[r_vel/2, r_vel]`.
    pub r_vel: f64,
    /// Per-frame probability of *keeping* course when nothing is hit.
    pub r_obst: f64,
}

impl Default for HeroParams {
    fn default() -> Self {
        Self { num: 25, initial_layout: 1, line_w: 1.0, r_vel: 0.9, r_obst: 0.997 }
    }
}

/// Static concentric squares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticParams {
    pub num: usize,
    pub margin: f64,
    pub line_w: f64,
    /// Ring count when the pointer is outside the canvas.
    pub idle_rings: f64,
    /// Ring count range mapped from pointer distance (far, near).
    pub min_rings: f64,
    pub max_rings: f64,
    /// Rotation jitter in degrees.
    pub r_rotate: f64,
    /// Shear jitter in radians.
    pub r_shear: f64,
    /// Ring inset jitter in pixels.
    pub r_size: f64,
    /// Noise time step per frame.
    pub time_step: f64,
}

impl Default for StaticParams {
    fn default() -> Self {
        Self {
            num: 17,
            margin: 25.0,
            line_w: 0.5,
            idle_rings: 15.0,
            min_rings: 1.0,
            max_rings: 35.0,
            r_rotate: 1.0,
            r_shear: 0.1,
            r_size: 42.0,
            time_step: 0.007,
        }
    }
}

/// Growing concentric squares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowingParams {
    pub num: usize,
    pub margin: f64,
    pub line_w: f64,
    /// Draw one cell at a time, scanning row by row.
    pub single_pen: bool,
    /// Rotation jitter in degrees.
    pub r_angle: f64,
    /// Shear jitter in radians.
    pub r_shear: f64,
    /// Largest shrink per completed lap, in pixels.
    pub r_size: f64,
    /// Pen speed as a fraction of the cell size.
    pub r_vel: f64,
}

impl Default for GrowingParams {
    fn default() -> Self {
        Self {
            num: 17,
            margin: 20.0,
            line_w: 0.5,
            single_pen: true,
            r_angle: 3.0,
            r_shear: 0.025,
            r_size: 10.0,
            r_vel: 0.075,
        }
    }
}
