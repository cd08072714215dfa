//! Seeded coherent noise in `[0, 1]`.

use ::noise::{NoiseFn, Value};

/// Smooth pseudo-random field sampled in two or three dimensions.
///
/// Value noise rather than gradient noise: the sketches sample at integer
/// grid coordinates, where gradient noise is identically zero.
#[derive(Clone)]
pub struct NoiseField {
    source: Value,
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").finish_non_exhaustive()
    }
}

impl NoiseField {
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self { source: Value::new(seed) }
    }

    #[must_use]
    pub fn noise2(&self, x: f64, y: f64) -> f64 {
        to_unit(self.source.get([x, y]))
    }

    #[must_use]
    pub fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        to_unit(self.source.get([x, y, z]))
    }
}

fn to_unit(raw: f64) -> f64 {
    ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
}
