//! Generative-drawing sketches for the portfolio site.
//!
//! Each sketch is a small discrete-time simulation of "pens" moving across a
//! 2D surface frame by frame and leaving trails. The crate is backend-agnostic:
//! every sketch draws through the [`surface::Surface`] trait, so the same code
//! runs against the browser canvas (see the `algodraw` host crate) and against
//! the in-memory [`raster::Raster`] used by tests and the preview CLI.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`sketch`] | Runtime contract ([`sketch::Sketch`]) and [`sketch::SketchKind`] |
//! | [`hero`] | 25×25 pen field with pixel-collision steering |
//! | [`static_squares`] | Noisy concentric squares, redrawn every frame |
//! | [`growing_squares`] | Per-cell bouncing pens that shrink their square each lap |
//! | [`surface`] | Drawing capability trait and [`surface::Rgba`] |
//! | [`raster`] | Exact in-memory RGBA surface |
//! | [`vector`] | [`vector::Vector2`] |
//! | [`math`] | `map_range`, uniform sampling, numeric casts |
//! | [`noise`] | Seeded coherent noise in `[0, 1]` |
//! | [`config`] | Serde-backed tuning parameters |
//! | [`consts`] | Shared constants (colors, container ids) |
//! | [`error`] | Error types |

pub mod config;
pub mod consts;
pub mod error;
pub mod growing_squares;
pub mod hero;
pub mod math;
pub mod noise;
pub mod raster;
pub mod sketch;
pub mod static_squares;
pub mod surface;
pub mod vector;

pub use config::SketchConfig;
pub use error::{ConfigError, SurfaceError};
pub use sketch::{Sketch, SketchKind};
pub use surface::{Rgba, Surface};
pub use vector::Vector2;
