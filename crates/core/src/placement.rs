//! Placed box representation.

use crate::geometry::{GeometryId, Rotation};
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A box instance bound to a position and an orientation.
///
/// `position` is the near-bottom-front-left corner in pallet coordinates
/// (x along length, y up, z along width).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacedBox {
    /// The ID of the box type.
    pub box_id: GeometryId,

    /// Unique instance id within one packing run.
    pub instance: usize,

    /// Min corner.
    pub position: Vector3<f64>,

    /// Actual orientation.
    pub rotation: Rotation,

    /// Index of `rotation` in the orientation set of the box's rotation class.
    pub rotation_index: usize,

    /// Weight of the instance.
    pub weight: f64,
}

impl PlacedBox {
    /// Creates a new placed box.
    pub fn new(
        box_id: GeometryId,
        instance: usize,
        position: Vector3<f64>,
        rotation: Rotation,
        rotation_index: usize,
        weight: f64,
    ) -> Self {
        Self {
            box_id,
            instance,
            position,
            rotation,
            rotation_index,
            weight,
        }
    }

    /// Returns the extent along (x, y, z).
    pub fn extent(&self) -> Vector3<f64> {
        self.rotation.extent()
    }

    /// Returns the min corner.
    pub fn min_corner(&self) -> Vector3<f64> {
        self.position
    }

    /// Returns the max corner.
    pub fn max_corner(&self) -> Vector3<f64> {
        self.position + self.extent()
    }

    /// Returns the top face height.
    pub fn top(&self) -> f64 {
        self.position.y + self.rotation.height
    }

    /// Returns the volume.
    pub fn volume(&self) -> f64 {
        self.rotation.volume()
    }

    /// Checks if this box overlaps another by more than `epsilon` on every axis.
    ///
    /// Touching faces do not count as overlap.
    pub fn overlaps(&self, other: &PlacedBox, epsilon: f64) -> bool {
        overlaps(
            &self.position,
            &self.max_corner(),
            &other.position,
            &other.max_corner(),
            epsilon,
        )
    }

    /// Checks if a point lies strictly inside this box (more than `epsilon`
    /// away from every face).
    pub fn contains_interior(&self, point: &Vector3<f64>, epsilon: f64) -> bool {
        let max = self.max_corner();
        (0..3).all(|axis| {
            point[axis] > self.position[axis] + epsilon && point[axis] < max[axis] - epsilon
        })
    }
}

/// Axis-aligned overlap test between two boxes given by their corners.
///
/// Two boxes are disjoint iff they are separated on at least one axis, i.e.
/// one box's far face is at or before the other's near face within `epsilon`.
pub fn overlaps(
    a_min: &Vector3<f64>,
    a_max: &Vector3<f64>,
    b_min: &Vector3<f64>,
    b_max: &Vector3<f64>,
    epsilon: f64,
) -> bool {
    let separated = (0..3)
        .any(|axis| a_max[axis] <= b_min[axis] + epsilon || b_max[axis] <= a_min[axis] + epsilon);
    !separated
}
