#[cfg(test)]
#[path = "vector_test.rs"]
mod vector_test;

use std::ops::{Add, AddAssign, Mul, Sub};

/// A 2D vector used for pen positions and velocities.
///
/// `Copy`, so taking a snapshot of a live position always yields an
/// independent value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction. The zero vector stays zero.
    #[must_use]
    pub fn normalized(self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 { self } else { self * (1.0 / mag) }
    }

    /// Same direction, given length. The zero vector stays zero.
    #[must_use]
    pub fn with_magnitude(self, magnitude: f64) -> Self {
        self.normalized() * magnitude
    }

    /// Rotate by `radians`. Positive angles turn clockwise on a y-down screen.
    #[must_use]
    pub fn rotated(self, radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).magnitude()
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}
