//! Small numeric helpers shared by the sketches.

#[cfg(test)]
#[path = "math_test.rs"]
mod math_test;

use rand::Rng;

/// Re-map `value` from the range `[start1, stop1]` to `[start2, stop2]`.
///
/// Linear and unclamped: values outside the source range extrapolate. A
/// degenerate source range maps everything to `start2`.
#[must_use]
pub fn map_range(value: f64, start1: f64, stop1: f64, start2: f64, stop2: f64) -> f64 {
    let span = stop1 - start1;
    if span == 0.0 {
        return start2;
    }
    start2 + (stop2 - start2) * ((value - start1) / span)
}

/// Uniform sample in `[lo, hi)`. Never panics: an empty or inverted range
/// interpolates the same way.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * rng.random::<f64>()
}

/// Random 64-bit seed derived from a float in `[0, 1)`, e.g. `Math.random()`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn seed_from_unit(unit: f64) -> u64 {
    (unit.clamp(0.0, 1.0) * u64::MAX as f64) as u64
}

/// Grid index as a coordinate. Grid sizes are far below f64's exact range.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn to_f64(n: usize) -> f64 {
    n as f64
}
