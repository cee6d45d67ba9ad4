//! Box types and their expanded instances.

use nalgebra::Vector3;
use palletpack_core::geometry::{Geometry, GeometryId, Rotation, RotationClass};
use palletpack_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A box type to be loaded ("package type").
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxSpec {
    /// Unique identifier.
    id: GeometryId,

    /// Nominal dimensions (length, width, height).
    dimensions: Vector3<f64>,

    /// Weight of one instance.
    weight: f64,

    /// Allowed re-orientations.
    rotation_class: RotationClass,

    /// Number of instances to place.
    quantity: usize,
}

impl BoxSpec {
    /// Creates a new box type with the given ID and nominal dimensions.
    pub fn new(id: impl Into<GeometryId>, length: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            dimensions: Vector3::new(length, width, height),
            weight: 0.0,
            rotation_class: RotationClass::default(),
            quantity: 1,
        }
    }

    /// Sets the quantity to place.
    pub fn with_quantity(mut self, n: usize) -> Self {
        self.quantity = n;
        self
    }

    /// Sets the weight of one instance.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the rotation class.
    pub fn with_rotation_class(mut self, class: RotationClass) -> Self {
        self.rotation_class = class;
        self
    }

    /// Returns the nominal dimensions (length, width, height).
    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
    }

    /// Returns the nominal length.
    pub fn length(&self) -> f64 {
        self.dimensions.x
    }

    /// Returns the nominal width.
    pub fn width(&self) -> f64 {
        self.dimensions.y
    }

    /// Returns the nominal height.
    pub fn height(&self) -> f64 {
        self.dimensions.z
    }

    /// Returns the weight of one instance.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns the allowed orientations.
    pub fn rotations(&self) -> Vec<Rotation> {
        self.rotation_class
            .orientations(self.length(), self.width(), self.height())
    }
}

impl Geometry for BoxSpec {
    fn id(&self) -> &GeometryId {
        &self.id
    }

    fn quantity(&self) -> usize {
        self.quantity
    }

    fn measure(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    fn rotation_class(&self) -> RotationClass {
        self.rotation_class
    }

    fn validate(&self) -> Result<()> {
        if self
            .dimensions
            .iter()
            .any(|d| !d.is_finite() || *d <= 0.0)
        {
            return Err(Error::InvalidBox(format!(
                "All dimensions for '{}' must be finite and positive",
                self.id
            )));
        }

        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(Error::InvalidBox(format!(
                "Weight for '{}' must be finite and non-negative",
                self.id
            )));
        }

        Ok(())
    }
}

/// One instance of a [`BoxSpec`] after repeat-count expansion.
///
/// Lives only for the duration of one packing run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedBox {
    /// Unique instance id within the run.
    pub instance: usize,
    /// Index of the source box type in the input list.
    pub type_index: usize,
    /// ID of the source box type.
    pub box_id: GeometryId,
    /// Nominal dimensions (length, width, height).
    pub dimensions: Vector3<f64>,
    /// Weight.
    pub weight: f64,
    /// Allowed re-orientations.
    pub rotation_class: RotationClass,
}

impl ExpandedBox {
    /// Creates the `instance`-th expanded box of a box type.
    pub fn from_spec(spec: &BoxSpec, type_index: usize, instance: usize) -> Self {
        Self {
            instance,
            type_index,
            box_id: spec.id.clone(),
            dimensions: spec.dimensions,
            weight: spec.weight,
            rotation_class: spec.rotation_class,
        }
    }

    /// Enumerates the allowed orientations.
    pub fn rotations(&self) -> Vec<Rotation> {
        self.rotation_class
            .orientations(self.dimensions.x, self.dimensions.y, self.dimensions.z)
    }

    /// Nominal volume.
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Nominal height.
    pub fn height(&self) -> f64 {
        self.dimensions.z
    }

    /// Nominal footprint.
    pub fn base_area(&self) -> f64 {
        self.dimensions.x * self.dimensions.y
    }

    /// Weight per unit volume.
    pub fn density(&self) -> f64 {
        let volume = self.volume();
        if volume > 0.0 {
            self.weight / volume
        } else {
            0.0
        }
    }

    /// Smallest height among the allowed orientations.
    pub fn min_height(&self) -> f64 {
        self.rotations()
            .iter()
            .map(|r| r.height)
            .fold(f64::INFINITY, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_volume() {
        let spec = BoxSpec::new("B1", 0.4, 0.3, 0.2);
        assert_relative_eq!(spec.measure(), 0.024, epsilon = 1e-12);
    }

    #[test]
    fn test_rotations_follow_class() {
        let spec = BoxSpec::new("B1", 0.4, 0.3, 0.2);
        assert_eq!(spec.rotations().len(), 6);

        let upright = spec
            .clone()
            .with_rotation_class(RotationClass::TwoWay);
        assert_eq!(upright.rotations().len(), 2);

        let fixed = spec.with_rotation_class(RotationClass::FixedOrientation);
        assert_eq!(fixed.rotations().len(), 1);
    }

    #[test]
    fn test_validation() {
        assert!(BoxSpec::new("B1", 1.0, 2.0, 3.0).validate().is_ok());
        assert!(BoxSpec::new("B2", -1.0, 2.0, 3.0).validate().is_err());
        assert!(BoxSpec::new("B3", f64::NAN, 2.0, 3.0).validate().is_err());
        assert!(BoxSpec::new("B4", 1.0, 2.0, 3.0)
            .with_weight(-5.0)
            .validate()
            .is_err());
        // Zero quantity just expands to nothing.
        assert!(BoxSpec::new("B5", 1.0, 2.0, 3.0)
            .with_quantity(0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_expanded_box() {
        let spec = BoxSpec::new("B1", 0.4, 0.3, 0.2)
            .with_weight(6.0)
            .with_rotation_class(RotationClass::TwoWay);
        let expanded = ExpandedBox::from_spec(&spec, 2, 7);

        assert_eq!(expanded.instance, 7);
        assert_eq!(expanded.type_index, 2);
        assert_eq!(expanded.box_id, "B1");
        assert_relative_eq!(expanded.density(), 250.0, epsilon = 1e-9);
        assert_relative_eq!(expanded.base_area(), 0.12, epsilon = 1e-12);
        assert_relative_eq!(expanded.min_height(), 0.2);
    }
}
