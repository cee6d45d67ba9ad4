//! Candidate position (anchor) set.
//!
//! Anchors are points where the near-bottom-front-left corner of the next box
//! may be tried. The set is seeded with the region origin and grows after
//! every placement with the corners of the placed box that touch it: the
//! three axis-adjacent corners and their four combinations.
//!
//! The set is kept sorted ascending by (y, z, x) so that greedy placement is
//! biased toward low, back, left positions.

use crate::boundary::Region;
use nalgebra::Vector3;
use palletpack_core::PlacedBox;
use std::cmp::Ordering;

/// Sorted, deduplicated set of anchor points.
#[derive(Debug, Clone)]
pub struct AnchorSet {
    points: Vec<Vector3<f64>>,
    epsilon: f64,
}

impl AnchorSet {
    /// Creates a set seeded with `origin`.
    pub fn new(origin: Vector3<f64>, epsilon: f64) -> Self {
        Self {
            points: vec![origin],
            epsilon,
        }
    }

    /// Returns the number of anchors.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the anchors in (y, z, x) order.
    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    /// Iterates the anchors in (y, z, x) order.
    pub fn iter(&self) -> impl Iterator<Item = &Vector3<f64>> {
        self.points.iter()
    }

    /// Returns true if an anchor matches `point` on all axes within epsilon.
    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        self.position_of(point).is_some()
    }

    /// Removes the anchor matching `point`, if any.
    pub fn remove(&mut self, point: &Vector3<f64>) -> bool {
        match self.position_of(point) {
            Some(idx) => {
                self.points.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Adds `point` if it lies within `region` and is not a duplicate.
    ///
    /// Does not restore the sort order; callers re-sort after a batch.
    pub fn insert(&mut self, point: Vector3<f64>, region: &Region) -> bool {
        if !region.contains_point(&point, self.epsilon) || self.contains(&point) {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Updates the set after `placed` was committed.
    ///
    /// `placed_boxes` must already include `placed`. Candidates strictly
    /// inside a placed box are dropped, as are existing anchors the new box
    /// swallowed; neither could ever host a feasible box.
    pub fn grow(&mut self, placed: &PlacedBox, region: &Region, placed_boxes: &[PlacedBox]) {
        let epsilon = self.epsilon;
        self.remove(&placed.position);
        self.points
            .retain(|p| !placed.contains_interior(p, epsilon));

        let extent = placed.extent();
        for mask in 1u8..8 {
            let offset = Vector3::new(
                if mask & 0b001 != 0 { extent.x } else { 0.0 },
                if mask & 0b010 != 0 { extent.y } else { 0.0 },
                if mask & 0b100 != 0 { extent.z } else { 0.0 },
            );
            let candidate = placed.position + offset;
            if placed_boxes
                .iter()
                .any(|b| b.contains_interior(&candidate, epsilon))
            {
                continue;
            }
            self.insert(candidate, region);
        }

        self.sort();
    }

    fn sort(&mut self) {
        self.points.sort_by(|a, b| compare_yzx(a, b));
    }

    fn position_of(&self, point: &Vector3<f64>) -> Option<usize> {
        let epsilon = self.epsilon;
        self.points
            .iter()
            .position(|p| (0..3).all(|axis| (p[axis] - point[axis]).abs() <= epsilon))
    }
}

/// Orders by height, then depth, then lateral position.
fn compare_yzx(a: &Vector3<f64>, b: &Vector3<f64>) -> Ordering {
    a.y.total_cmp(&b.y)
        .then_with(|| a.z.total_cmp(&b.z))
        .then_with(|| a.x.total_cmp(&b.x))
}
