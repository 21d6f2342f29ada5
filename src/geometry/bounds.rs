use geo::{Coord, coord};
use rand::Rng;

use crate::defaults;
use crate::error::GenerationError;

/// Axis-aligned square that bounds every polygon vertex in a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min_x: f64,
    pub min_y: f64,
    pub size: f64,
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            size: defaults::DOMAIN_SIZE,
        }
    }
}

impl Domain {
    /// Create a square domain with lower-left corner `(min_x, min_y)`
    pub fn new(min_x: f64, min_y: f64, size: f64) -> Result<Self, GenerationError> {
        if !min_x.is_finite() || !min_y.is_finite() {
            return Err(GenerationError::InvalidCorner { min_x, min_y });
        }
        if !size.is_finite() || size <= 0.0 {
            return Err(GenerationError::InvalidDomain { size });
        }
        Ok(Self { min_x, min_y, size })
    }

    /// Square `[0, size] x [0, size]`
    pub fn with_size(size: f64) -> Result<Self, GenerationError> {
        Self::new(0.0, 0.0, size)
    }

    pub fn max_x(&self) -> f64 {
        self.min_x + self.size
    }

    pub fn max_y(&self) -> f64 {
        self.min_y + self.size
    }

    /// Closed containment: points on the border count as inside
    pub fn contains(&self, c: Coord<f64>) -> bool {
        (self.min_x..=self.max_x()).contains(&c.x) && (self.min_y..=self.max_y()).contains(&c.y)
    }

    /// Draw a point uniformly from the square
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Coord<f64> {
        coord! {
            x: rng.random_range(self.min_x..=self.max_x()),
            y: rng.random_range(self.min_y..=self.max_y()),
        }
    }

    /// Pull a coordinate back onto the square
    pub fn clamp(&self, c: Coord<f64>) -> Coord<f64> {
        coord! {
            x: c.x.clamp(self.min_x, self.max_x()),
            y: c.y.clamp(self.min_y, self.max_y()),
        }
    }

    /// A randomly placed sub-square of side `size * scale` lying fully inside this one
    ///
    /// # Arguments
    /// * `scale` - Fraction of the side length to keep, in (0, 1]
    pub fn random_window<R: Rng>(&self, scale: f64, rng: &mut R) -> Domain {
        let side = self.size * scale.clamp(f64::MIN_POSITIVE, 1.0);
        let slack = self.size - side;
        if slack <= 0.0 {
            return *self;
        }

        Domain {
            min_x: self.min_x + rng.random_range(0.0..=slack),
            min_y: self.min_y + rng.random_range(0.0..=slack),
            size: side,
        }
    }
}
