//! Core geometry traits and the box rotation model.

use crate::Result;
use nalgebra::Vector3;
use std::f64::consts::FRAC_PI_2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for a box type.
pub type GeometryId = String;

/// Which re-orientations of a box are allowed.
///
/// The source labels are kept as serde aliases: `vertical` only keeps the
/// nominal orientation and `horizontal` only allows the length/width swap.
/// They do not describe literal vertical or horizontal motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RotationClass {
    /// Nominal orientation only.
    #[cfg_attr(feature = "serde", serde(alias = "vertical"))]
    FixedOrientation,
    /// Nominal orientation plus a yaw swap of length and width.
    #[cfg_attr(feature = "serde", serde(alias = "horizontal"))]
    TwoWay,
    /// All six axis-aligned permutations.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "all"))]
    SixWay,
}

impl RotationClass {
    /// Number of orientations this class enumerates.
    pub fn orientation_count(&self) -> usize {
        match self {
            Self::FixedOrientation => 1,
            Self::TwoWay => 2,
            Self::SixWay => 6,
        }
    }

    /// Enumerates the orientation set for nominal dimensions `(l, w, h)`.
    ///
    /// The order is fixed; greedy placement breaks ties by it.
    pub fn orientations(&self, l: f64, w: f64, h: f64) -> Vec<Rotation> {
        let q = FRAC_PI_2;
        match self {
            Self::FixedOrientation => vec![Rotation::new(l, w, h, 0.0, 0.0, 0.0)],
            Self::TwoWay => vec![
                Rotation::new(l, w, h, 0.0, 0.0, 0.0),
                Rotation::new(w, l, h, 0.0, q, 0.0),
            ],
            Self::SixWay => vec![
                Rotation::new(l, w, h, 0.0, 0.0, 0.0),
                Rotation::new(w, l, h, 0.0, q, 0.0),
                Rotation::new(l, h, w, q, 0.0, 0.0),
                Rotation::new(h, w, l, 0.0, 0.0, q),
                Rotation::new(w, h, l, q, q, 0.0),
                Rotation::new(h, l, w, q, 0.0, q),
            ],
        }
    }
}

/// A concrete orientation of a box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rotation {
    /// Extent along the pallet length (x).
    pub length: f64,
    /// Extent along the pallet width (z).
    pub width: f64,
    /// Vertical extent (y).
    pub height: f64,
    /// Rotation angles about x, y, z in radians that produce this
    /// orientation from the nominal dimensions.
    pub angles: Vector3<f64>,
}

impl Rotation {
    /// Creates a rotation from actual dimensions and angles (radians).
    pub fn new(length: f64, width: f64, height: f64, rx: f64, ry: f64, rz: f64) -> Self {
        Self {
            length,
            width,
            height,
            angles: Vector3::new(rx, ry, rz),
        }
    }

    /// Extent in pallet coordinates: (length, height, width) along (x, y, z).
    pub fn extent(&self) -> Vector3<f64> {
        Vector3::new(self.length, self.height, self.width)
    }

    /// Returns the volume, bit-identical for every orientation of a box.
    pub fn volume(&self) -> f64 {
        let mut dims = [self.length, self.width, self.height];
        dims.sort_by(f64::total_cmp);
        dims[0] * dims[1] * dims[2]
    }

    /// Returns the footprint area.
    pub fn base_area(&self) -> f64 {
        self.length * self.width
    }

    /// Returns true if both rotations have exactly the same dimensions.
    pub fn same_dimensions(&self, other: &Rotation) -> bool {
        self.length == other.length && self.width == other.width && self.height == other.height
    }
}

/// Trait for box types that can be loaded.
pub trait Geometry: Clone + Send + Sync {
    /// Returns the identifier of this box type.
    fn id(&self) -> &GeometryId;

    /// Returns the number of instances to place.
    fn quantity(&self) -> usize;

    /// Returns the nominal volume.
    fn measure(&self) -> f64;

    /// Returns the allowed rotation class.
    fn rotation_class(&self) -> RotationClass;

    /// Validates the geometry and returns an error if invalid.
    fn validate(&self) -> Result<()>;
}

/// Trait for containers that boxes are loaded into.
pub trait Boundary {
    /// Returns the loadable volume.
    fn measure(&self) -> f64;

    /// Validates the boundary and returns an error if invalid.
    fn validate(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orientation_counts() {
        for class in [
            RotationClass::FixedOrientation,
            RotationClass::TwoWay,
            RotationClass::SixWay,
        ] {
            assert_eq!(
                class.orientations(1.0, 2.0, 3.0).len(),
                class.orientation_count()
            );
        }
    }

    #[test]
    fn test_two_way_swaps_footprint() {
        let rotations = RotationClass::TwoWay.orientations(0.4, 0.3, 0.2);
        assert_eq!(rotations[1].length, 0.3);
        assert_eq!(rotations[1].width, 0.4);
        assert_eq!(rotations[1].height, 0.2);
        assert_relative_eq!(rotations[1].angles.y, FRAC_PI_2);
    }

    #[test]
    fn test_six_way_permutations_are_distinct() {
        let rotations = RotationClass::SixWay.orientations(1.0, 2.0, 3.0);
        for (i, a) in rotations.iter().enumerate() {
            for b in rotations.iter().skip(i + 1) {
                assert!(!a.same_dimensions(b));
            }
            assert_relative_eq!(a.volume(), 6.0);
        }
    }

    #[test]
    fn test_extent_axis_mapping() {
        let rotation = Rotation::new(1.0, 2.0, 3.0, 0.0, 0.0, 0.0);
        assert_eq!(rotation.extent(), Vector3::new(1.0, 3.0, 2.0));
        assert_relative_eq!(rotation.base_area(), 2.0);
    }
}
