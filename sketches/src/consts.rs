//! Shared constants for the sketches crate.

use crate::surface::Rgba;

// ── Containers ──────────────────────────────────────────────────

/// DOM id of the container hosting the hero field.
pub const HERO_CONTAINER_ID: &str = "hero-container";

/// DOM id of the container hosting the static concentric squares.
pub const STATIC_SQUARES_CONTAINER_ID: &str = "text-container-1";

/// DOM id of the container hosting the growing concentric squares.
pub const GROWING_SQUARES_CONTAINER_ID: &str = "text-container-2";

// ── Colors ──────────────────────────────────────────────────────

/// Hero field background. Collision detection compares samples against it.
pub const HERO_BACKGROUND: Rgba = Rgba::gray(0);

/// Ink used for the hero border decoration. Differs from the background by
/// one step so that pens still collide with it.
pub const HERO_BORDER_INK: Rgba = Rgba::gray(1);

/// Paper color for both concentric-squares sketches.
pub const PAPER: Rgba = Rgba::gray(255);

/// Pen color for both concentric-squares sketches.
pub const INK: Rgba = Rgba::gray(0);

// ── Math ────────────────────────────────────────────────────────

/// 45° in radians, the hero field's steering step.
pub const EIGHTH_TURN: f64 = std::f64::consts::FRAC_PI_4;
