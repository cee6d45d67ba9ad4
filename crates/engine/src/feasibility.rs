//! Feasibility checks: bounds and pairwise collision.
//!
//! Pure predicates over a region and the boxes placed so far. Every test uses
//! the same tolerance, so touching faces and boundary contact are allowed.

use crate::boundary::Region;
use crate::geometry::ExpandedBox;
use nalgebra::Vector3;
use palletpack_core::placement::overlaps;
use palletpack_core::{PlacedBox, Rotation};
use std::collections::{HashMap, HashSet};

/// Relative slack on the weight sum, absorbing summation order.
const WEIGHT_SLACK: f64 = 1e-9;

/// First rule a finished placement list breaks.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// The instance id is not one of the run's expanded boxes.
    UnknownInstance(usize),
    /// The instance was placed more than once.
    DuplicateInstance(usize),
    /// Box id or weight differ from the expanded box.
    MismatchedBox(usize),
    /// The dimensions are not an allowed orientation of the box.
    DisallowedRotation(usize),
    /// The box leaves the load region.
    OutOfBounds(usize),
    /// The box overlaps an earlier one.
    Overlap(usize),
    /// The running weight exceeds the cap.
    Overweight(usize),
}

/// Checks that a box with `rotation` at `anchor` stays inside `region`.
pub fn within_bounds(
    region: &Region,
    anchor: &Vector3<f64>,
    rotation: &Rotation,
    epsilon: f64,
) -> bool {
    region.contains_box(anchor, &rotation.extent(), epsilon)
}

/// Checks whether a box with `rotation` at `anchor` overlaps any placed box.
pub fn collides(
    anchor: &Vector3<f64>,
    rotation: &Rotation,
    placed: &[PlacedBox],
    epsilon: f64,
) -> bool {
    let max = anchor + rotation.extent();
    placed
        .iter()
        .any(|p| overlaps(anchor, &max, &p.position, &p.max_corner(), epsilon))
}

/// Full feasibility: in bounds and collision-free.
pub fn is_feasible(
    region: &Region,
    anchor: &Vector3<f64>,
    rotation: &Rotation,
    placed: &[PlacedBox],
    epsilon: f64,
) -> bool {
    within_bounds(region, anchor, rotation, epsilon) && !collides(anchor, rotation, placed, epsilon)
}

/// Checks a complete placement list against the run's boxes: every
/// instance known and used once, an allowed rotation, containment,
/// pairwise disjointness and the weight cap.
pub fn check_placements(
    placed: &[PlacedBox],
    boxes: &[ExpandedBox],
    region: &Region,
    max_weight: f64,
    epsilon: f64,
) -> Result<(), Violation> {
    let by_instance: HashMap<usize, &ExpandedBox> = boxes.iter().map(|b| (b.instance, b)).collect();
    let mut seen = HashSet::new();
    let mut weight = 0.0;

    for (i, p) in placed.iter().enumerate() {
        let item = by_instance
            .get(&p.instance)
            .ok_or(Violation::UnknownInstance(p.instance))?;
        if !seen.insert(p.instance) {
            return Err(Violation::DuplicateInstance(p.instance));
        }
        if item.box_id != p.box_id || item.weight != p.weight {
            return Err(Violation::MismatchedBox(p.instance));
        }
        if !item.rotations().iter().any(|r| r.same_dimensions(&p.rotation)) {
            return Err(Violation::DisallowedRotation(p.instance));
        }
        if !within_bounds(region, &p.position, &p.rotation, epsilon) {
            return Err(Violation::OutOfBounds(p.instance));
        }
        if collides(&p.position, &p.rotation, &placed[..i], epsilon) {
            return Err(Violation::Overlap(p.instance));
        }
        weight += p.weight;
        if weight > max_weight * (1.0 + WEIGHT_SLACK) {
            return Err(Violation::Overweight(p.instance));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::PalletSpec;
    use crate::geometry::BoxSpec;
    use crate::packing_utils::expand_boxes;

    const EPS: f64 = 0.0005;

    fn rotation(l: f64, w: f64, h: f64) -> Rotation {
        Rotation::new(l, w, h, 0.0, 0.0, 0.0)
    }

    #[test]
    fn test_bounds() {
        let region = PalletSpec::new(1.2, 0.8, 2.0, 1000.0).load_region();
        let r = rotation(0.4, 0.3, 0.2);

        assert!(within_bounds(&region, &Vector3::new(0.8, 0.0, 0.5), &r, EPS));
        assert!(!within_bounds(&region, &Vector3::new(0.9, 0.0, 0.0), &r, EPS));
        assert!(!within_bounds(&region, &Vector3::new(0.0, 0.0, 0.6), &r, EPS));
        assert!(!within_bounds(&region, &Vector3::new(0.0, 1.9, 0.0), &r, EPS));
        // Overshoot within tolerance is accepted.
        assert!(within_bounds(&region, &Vector3::new(0.8003, 0.0, 0.0), &r, EPS));
    }

    #[test]
    fn test_collision() {
        let placed = vec![PlacedBox::new(
            "A".to_string(),
            0,
            Vector3::new(0.0, 0.0, 0.0),
            rotation(0.4, 0.3, 0.2),
            0,
            1.0,
        )];
        let r = rotation(0.4, 0.3, 0.2);

        assert!(collides(&Vector3::new(0.2, 0.0, 0.0), &r, &placed, EPS));
        assert!(!collides(&Vector3::new(0.4, 0.0, 0.0), &r, &placed, EPS));
        assert!(!collides(&Vector3::new(0.0, 0.2, 0.0), &r, &placed, EPS));
        assert!(!collides(&Vector3::new(0.0, 0.0, 0.3), &r, &placed, EPS));
        assert!(!collides(&Vector3::new(0.3998, 0.0, 0.0), &r, &placed, EPS));
    }

    #[test]
    fn test_is_feasible_combines_both() {
        let region = PalletSpec::new(1.2, 0.8, 2.0, 1000.0).load_region();
        let r = rotation(0.4, 0.3, 0.2);
        let placed = vec![PlacedBox::new(
            "A".to_string(),
            0,
            Vector3::new(0.0, 0.0, 0.0),
            r,
            0,
            1.0,
        )];

        assert!(is_feasible(&region, &Vector3::new(0.4, 0.0, 0.0), &r, &placed, EPS));
        assert!(!is_feasible(&region, &Vector3::new(0.1, 0.0, 0.0), &r, &placed, EPS));
        assert!(!is_feasible(&region, &Vector3::new(1.0, 0.0, 0.0), &r, &placed, EPS));
    }

    fn placed_from(item: &ExpandedBox, x: f64, y: f64, z: f64) -> PlacedBox {
        PlacedBox::new(
            item.box_id.clone(),
            item.instance,
            Vector3::new(x, y, z),
            item.rotations()[0],
            0,
            item.weight,
        )
    }

    #[test]
    fn test_check_placements_accepts_valid() {
        let pallet = PalletSpec::new(1.2, 0.8, 2.0, 100.0);
        let boxes = expand_boxes(&[BoxSpec::new("A", 0.4, 0.3, 0.2).with_weight(50.0).with_quantity(2)]);
        let placed = vec![
            placed_from(&boxes[0], 0.0, 0.0, 0.0),
            placed_from(&boxes[1], 0.4, 0.0, 0.0),
        ];

        assert_eq!(
            check_placements(&placed, &boxes, &pallet.load_region(), pallet.max_weight(), EPS),
            Ok(())
        );
    }

    #[test]
    fn test_check_placements_violations() {
        let pallet = PalletSpec::new(1.2, 0.8, 2.0, 60.0);
        let region = pallet.load_region();
        let boxes = expand_boxes(&[BoxSpec::new("A", 0.4, 0.3, 0.2).with_weight(40.0).with_quantity(2)]);
        let check = |placed: &[PlacedBox]| check_placements(placed, &boxes, &region, 60.0, EPS);

        let first = placed_from(&boxes[0], 0.0, 0.0, 0.0);
        assert_eq!(
            check(&[first.clone(), placed_from(&boxes[1], 0.2, 0.0, 0.0)]),
            Err(Violation::Overlap(1))
        );
        assert_eq!(
            check(&[first.clone(), first.clone()]),
            Err(Violation::DuplicateInstance(0))
        );
        assert_eq!(
            check(&[placed_from(&boxes[0], 1.0, 0.0, 0.0)]),
            Err(Violation::OutOfBounds(0))
        );
        assert_eq!(
            check(&[first.clone(), placed_from(&boxes[1], 0.4, 0.0, 0.0)]),
            Err(Violation::Overweight(1))
        );

        let mut stranger = first.clone();
        stranger.instance = 7;
        assert_eq!(check(&[stranger]), Err(Violation::UnknownInstance(7)));

        let mut stretched = first.clone();
        stretched.rotation = rotation(0.5, 0.3, 0.2);
        assert_eq!(check(&[stretched]), Err(Violation::DisallowedRotation(0)));

        let mut renamed = first;
        renamed.box_id = "B".to_string();
        assert_eq!(check(&[renamed]), Err(Violation::MismatchedBox(0)));
    }
}
