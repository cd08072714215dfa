//! Runtime contract shared by the three sketches.
//!
//! A host binds one sketch instance per container: it calls [`Sketch::setup`]
//! once against a freshly sized surface, then [`Sketch::frame`] once per
//! animation frame. Resize and pointer events are delivered between frames.

use crate::config::SketchConfig;
use crate::consts::{GROWING_SQUARES_CONTAINER_ID, HERO_CONTAINER_ID, STATIC_SQUARES_CONTAINER_ID};
use crate::growing_squares::GrowingSquares;
use crate::hero::HeroField;
use crate::static_squares::StaticSquares;
use crate::surface::{Surface, SurfaceResult};
use crate::vector::Vector2;

/// One simulation bound to one surface.
pub trait Sketch {
    fn kind(&self) -> SketchKind;

    /// Initial draw, called once after the surface has been created.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    fn setup(&mut self, surface: &mut dyn Surface) -> SurfaceResult;

    /// Advance one frame and draw it.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    fn frame(&mut self, surface: &mut dyn Surface) -> SurfaceResult;

    /// Resize the surface to the container's new pixel size and reset as needed.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    fn resize(&mut self, surface: &mut dyn Surface, width: u32, height: u32) -> SurfaceResult;

    /// Pointer click in surface coordinates. Returns whether the sketch reacted.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    fn pointer_click(&mut self, _surface: &mut dyn Surface, _x: f64, _y: f64) -> SurfaceResult<bool> {
        Ok(false)
    }

    /// Pointer moved to `position` (surface coordinates), or left the surface.
    fn pointer_moved(&mut self, _position: Option<Vector2>) {}
}

/// The three sketches the site knows how to mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SketchKind {
    Hero,
    StaticSquares,
    GrowingSquares,
}

impl SketchKind {
    /// Mount order.
    pub const ALL: [Self; 3] = [Self::Hero, Self::StaticSquares, Self::GrowingSquares];

    /// DOM id of the container this sketch binds to.
    #[must_use]
    pub fn container_id(self) -> &'static str {
        match self {
            Self::Hero => HERO_CONTAINER_ID,
            Self::StaticSquares => STATIC_SQUARES_CONTAINER_ID,
            Self::GrowingSquares => GROWING_SQUARES_CONTAINER_ID,
        }
    }

    #[must_use]
    pub fn from_container_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.container_id() == id)
    }

    /// Per-kind seed so that sketches sharing a config seed do not mirror each other.
    #[must_use]
    pub fn derive_seed(self, seed: u64) -> u64 {
        let salt: u64 = match self {
            Self::Hero => 0x9E37_79B9_7F4A_7C15,
            Self::StaticSquares => 0xBF58_476D_1CE4_E5B9,
            Self::GrowingSquares => 0x94D0_49BB_1331_11EB,
        };
        seed ^ salt
    }

    /// Construct the simulation for this kind at the given surface size.
    #[must_use]
    pub fn build(self, config: &SketchConfig, seed: u64, width: u32, height: u32) -> Box<dyn Sketch> {
        let seed = self.derive_seed(seed);
        match self {
            Self::Hero => Box::new(HeroField::new(config.hero.clone(), width, height, seed)),
            Self::StaticSquares => Box::new(StaticSquares::new(config.static_squares.clone(), width, height, seed)),
            Self::GrowingSquares => Box::new(GrowingSquares::new(config.growing.clone(), width, seed)),
        }
    }
}

impl std::fmt::Display for SketchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.container_id())
    }
}
