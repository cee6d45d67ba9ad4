//! Pallet specification and load regions.

use nalgebra::Vector3;
use palletpack_core::geometry::Boundary;
use palletpack_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A pallet: footprint, base offset, usable load height and weight cap.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PalletSpec {
    /// Footprint extent along x.
    length: f64,

    /// Footprint extent along z.
    width: f64,

    /// Height of the pallet deck; loading starts here.
    base_height: f64,

    /// Usable vertical extent above the base.
    load_height: f64,

    /// Maximum total load weight.
    max_weight: f64,
}

impl PalletSpec {
    /// Creates a pallet with a zero base height.
    pub fn new(length: f64, width: f64, load_height: f64, max_weight: f64) -> Self {
        Self {
            length,
            width,
            base_height: 0.0,
            load_height,
            max_weight,
        }
    }

    /// Sets the base height.
    pub fn with_base_height(mut self, base_height: f64) -> Self {
        self.base_height = base_height;
        self
    }

    /// Returns the footprint length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Returns the footprint width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the base height.
    pub fn base_height(&self) -> f64 {
        self.base_height
    }

    /// Returns the load height.
    pub fn load_height(&self) -> f64 {
        self.load_height
    }

    /// Returns the maximum load weight.
    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    /// Highest y a box may reach.
    pub fn top(&self) -> f64 {
        self.base_height + self.load_height
    }

    /// Footprint area.
    pub fn footprint(&self) -> f64 {
        self.length * self.width
    }

    /// Full loadable region.
    pub fn load_region(&self) -> Region {
        self.band(self.base_height, self.top())
    }

    /// Horizontal band of the loadable region between `floor` and `ceiling`.
    pub fn band(&self, floor: f64, ceiling: f64) -> Region {
        Region {
            min: Vector3::new(0.0, floor, 0.0),
            max: Vector3::new(self.length, ceiling, self.width),
        }
    }
}

impl Boundary for PalletSpec {
    fn measure(&self) -> f64 {
        self.length * self.width * self.load_height
    }

    fn validate(&self) -> Result<()> {
        let positive = [
            ("length", self.length),
            ("width", self.width),
            ("load height", self.load_height),
            ("max weight", self.max_weight),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidPallet(format!(
                    "{} must be finite and positive, got {}",
                    name, value
                )));
            }
        }

        if !self.base_height.is_finite() || self.base_height < 0.0 {
            return Err(Error::InvalidPallet(format!(
                "base height must be finite and non-negative, got {}",
                self.base_height
            )));
        }

        Ok(())
    }
}

/// Axis-aligned region boxes must stay within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Min corner.
    pub min: Vector3<f64>,
    /// Max corner.
    pub max: Vector3<f64>,
}

impl Region {
    /// Checks if a point lies within the region, within `epsilon`.
    pub fn contains_point(&self, point: &Vector3<f64>, epsilon: f64) -> bool {
        (0..3).all(|axis| {
            point[axis] >= self.min[axis] - epsilon && point[axis] <= self.max[axis] + epsilon
        })
    }

    /// Checks if a box at `position` with `extent` stays within the region,
    /// within `epsilon`.
    pub fn contains_box(&self, position: &Vector3<f64>, extent: &Vector3<f64>, epsilon: f64) -> bool {
        (0..3).all(|axis| {
            position[axis] >= self.min[axis] - epsilon
                && position[axis] + extent[axis] <= self.max[axis] + epsilon
        })
    }

    /// Region height.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}
