//! Per-trial packing workspace and the single-box greedy placer.
//!
//! A [`Workspace`] owns the placed list and the anchor set of exactly one
//! strategy trial. Trials never share one, which is what lets the packer run
//! them in parallel.

use crate::anchor::AnchorSet;
use crate::boundary::{PalletSpec, Region};
use crate::feasibility::is_feasible;
use crate::geometry::ExpandedBox;
use nalgebra::Vector3;
use palletpack_core::{Config, PlacedBox, PlacementScoring, Rotation};

// Weights of the anchor position term in `PlacementScoring::Weighted`.
// Offsets are normalized by the region extents, so height dominates unless a
// box is thinner than a hundredth of the load height.
const LOW_WEIGHT: f64 = 1000.0;
const BACK_WEIGHT: f64 = 10.0;
const LEFT_WEIGHT: f64 = 2.0;
/// Weight of the vertical gap in the wasted-space term.
const ABOVE_GAP_WEIGHT: f64 = 0.5;

/// Best (anchor, rotation) pair found for one box.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    /// Anchor the box would be placed at.
    pub anchor: Vector3<f64>,
    /// Orientation.
    pub rotation: Rotation,
    /// Index of `rotation` in the box's orientation set.
    pub rotation_index: usize,
    /// Placement score (lower is better).
    pub score: f64,
}

/// Mutable state of one strategy trial.
#[derive(Debug, Clone)]
pub struct Workspace {
    region: Region,
    max_weight: f64,
    epsilon: f64,
    scoring: PlacementScoring,
    anchors: AnchorSet,
    placed: Vec<PlacedBox>,
    base_weight: f64,
    placed_weight: f64,
}

impl Workspace {
    /// Creates an empty workspace over the full load region of `pallet`.
    pub fn new(pallet: &PalletSpec, config: &Config) -> Self {
        Self::with_region(pallet, config, pallet.load_region(), 0.0)
    }

    /// Creates an empty workspace restricted to the band `[floor, ceiling]`.
    ///
    /// `carried_weight` is weight already loaded elsewhere on the pallet; it
    /// counts against the weight cap.
    pub fn band(
        pallet: &PalletSpec,
        config: &Config,
        floor: f64,
        ceiling: f64,
        carried_weight: f64,
    ) -> Self {
        Self::with_region(pallet, config, pallet.band(floor, ceiling), carried_weight)
    }

    fn with_region(
        pallet: &PalletSpec,
        config: &Config,
        region: Region,
        carried_weight: f64,
    ) -> Self {
        Self {
            region,
            max_weight: pallet.max_weight(),
            epsilon: config.epsilon,
            scoring: config.scoring,
            anchors: AnchorSet::new(region.min, config.epsilon),
            placed: Vec::new(),
            base_weight: carried_weight,
            placed_weight: 0.0,
        }
    }

    /// Returns the region boxes are confined to.
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Returns the current anchor set.
    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    /// Returns the boxes placed so far.
    pub fn placed(&self) -> &[PlacedBox] {
        &self.placed
    }

    /// Consumes the workspace, returning its placements.
    pub fn into_placed(self) -> Vec<PlacedBox> {
        self.placed
    }

    /// Returns the number of placed boxes.
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    /// Total weight counted against the cap, including carried weight.
    pub fn current_weight(&self) -> f64 {
        self.base_weight + self.placed_weight
    }

    /// Weight admission guard: true if `weight` more stays within the cap.
    pub fn can_add_weight(&self, weight: f64) -> bool {
        self.current_weight() + weight <= self.max_weight
    }

    /// Highest box top in this workspace, or the region floor if empty.
    pub fn max_top(&self) -> f64 {
        self.placed
            .iter()
            .map(PlacedBox::top)
            .fold(self.region.min.y, f64::max)
    }

    /// Checks bounds and collisions for a box at `anchor`.
    pub fn is_feasible(&self, anchor: &Vector3<f64>, rotation: &Rotation) -> bool {
        is_feasible(&self.region, anchor, rotation, &self.placed, self.epsilon)
    }

    /// Scores a placement; lower means a tighter fit.
    pub fn placement_score(&self, anchor: &Vector3<f64>, rotation: &Rotation) -> f64 {
        let far = anchor + rotation.extent();
        let gap_right = self.region.max.x - far.x;
        let gap_above = self.region.max.y - far.y;
        let gap_front = self.region.max.z - far.z;

        match self.scoring {
            PlacementScoring::Leftover => gap_above + gap_right + gap_front,
            PlacementScoring::Weighted => {
                let size = self.region.max - self.region.min;
                let offset = anchor - self.region.min;
                let position = LOW_WEIGHT * offset.y / size.y
                    + BACK_WEIGHT * offset.z / size.z
                    + LEFT_WEIGHT * offset.x / size.x;
                let waste =
                    gap_right / size.x + gap_front / size.z + ABOVE_GAP_WEIGHT * gap_above / size.y;
                position + waste
            }
        }
    }

    /// Finds the best feasible (anchor, rotation) pair for `item`.
    ///
    /// Anchors are scanned in (y, z, x) order and rotations in enumeration
    /// order; on equal scores the first pair wins.
    pub fn best_candidate(&self, item: &ExpandedBox) -> Option<Candidate> {
        let rotations = item.rotations();
        let mut best: Option<Candidate> = None;

        for anchor in self.anchors.iter() {
            for (rotation_index, rotation) in rotations.iter().enumerate() {
                if !self.is_feasible(anchor, rotation) {
                    continue;
                }
                let score = self.placement_score(anchor, rotation);
                if best.map_or(true, |b| score < b.score) {
                    best = Some(Candidate {
                        anchor: *anchor,
                        rotation: *rotation,
                        rotation_index,
                        score,
                    });
                }
            }
        }

        best
    }

    /// Greedily places `item` at its best candidate.
    ///
    /// Returns false when the weight guard rejects it or nothing is feasible;
    /// the box is then simply left out.
    pub fn place(&mut self, item: &ExpandedBox) -> bool {
        if !self.can_add_weight(item.weight) {
            return false;
        }
        match self.best_candidate(item) {
            Some(candidate) => {
                let placed = PlacedBox::new(
                    item.box_id.clone(),
                    item.instance,
                    candidate.anchor,
                    candidate.rotation,
                    candidate.rotation_index,
                    item.weight,
                );
                self.commit(placed);
                true
            }
            None => false,
        }
    }

    /// Places `item` at a fixed position and orientation, if admissible.
    pub fn place_at(
        &mut self,
        item: &ExpandedBox,
        position: Vector3<f64>,
        rotation: Rotation,
        rotation_index: usize,
    ) -> bool {
        self.place_placed(PlacedBox::new(
            item.box_id.clone(),
            item.instance,
            position,
            rotation,
            rotation_index,
            item.weight,
        ))
    }

    /// Commits an already positioned box after the weight guard and a
    /// feasibility check.
    pub fn place_placed(&mut self, placed: PlacedBox) -> bool {
        if !self.can_add_weight(placed.weight)
            || !self.is_feasible(&placed.position, &placed.rotation)
        {
            return false;
        }
        self.commit(placed);
        true
    }

    fn commit(&mut self, placed: PlacedBox) {
        self.placed_weight += placed.weight;
        self.placed.push(placed);
        if let Some(last) = self.placed.last() {
            self.anchors.grow(last, &self.region, &self.placed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoxSpec;
    use palletpack_core::RotationClass;

    fn pallet() -> PalletSpec {
        PalletSpec::new(1.2, 0.8, 2.0, 1000.0).with_base_height(0.15)
    }

    fn item(instance: usize, spec: &BoxSpec) -> ExpandedBox {
        ExpandedBox::from_spec(spec, 0, instance)
    }

    #[test]
    fn test_first_box_at_origin() {
        let pallet = pallet();
        let mut ws = Workspace::new(&pallet, &Config::default());
        let spec = BoxSpec::new("A", 0.4, 0.3, 0.2).with_weight(5.0);

        assert!(ws.place(&item(0, &spec)));
        let first = &ws.placed()[0];
        assert_eq!(first.position, Vector3::new(0.0, 0.15, 0.0));
        assert_eq!(ws.current_weight(), 5.0);
    }

    #[test]
    fn test_weighted_scoring_prefers_flat_low_placement() {
        let pallet = pallet();
        let mut ws = Workspace::new(&pallet, &Config::default());
        let spec = BoxSpec::new("A", 0.2, 0.4, 0.3);

        assert!(ws.place(&item(0, &spec)));
        let first = &ws.placed()[0];
        // Lying flat on its largest face.
        assert_eq!(first.rotation.height, 0.2);
        assert!((first.rotation.base_area() - 0.12).abs() < 1e-12);
    }

    #[test]
    fn test_fills_floor_before_stacking() {
        let pallet = pallet();
        let mut ws = Workspace::new(&pallet, &Config::default());
        let spec = BoxSpec::new("A", 0.4, 0.4, 0.2)
            .with_rotation_class(RotationClass::FixedOrientation);

        for i in 0..6 {
            assert!(ws.place(&item(i, &spec)));
        }
        // 3 × 2 boxes cover the footprint at the base height.
        assert!(ws
            .placed()
            .iter()
            .all(|p| (p.position.y - 0.15).abs() < 1e-9));

        assert!(ws.place(&item(6, &spec)));
        assert!((ws.placed()[6].position.y - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_weight_guard_skips_search() {
        let pallet = PalletSpec::new(1.2, 0.8, 2.0, 10.0);
        let mut ws = Workspace::new(&pallet, &Config::default());
        let spec = BoxSpec::new("A", 0.1, 0.1, 0.1).with_weight(4.0);

        assert!(ws.place(&item(0, &spec)));
        assert!(ws.place(&item(1, &spec)));
        assert!(!ws.place(&item(2, &spec)));
        assert_eq!(ws.placed_count(), 2);
        assert!(ws.can_add_weight(2.0));
        assert!(!ws.can_add_weight(2.5));
    }

    #[test]
    fn test_infeasible_box_is_left_out() {
        let pallet = pallet();
        let mut ws = Workspace::new(&pallet, &Config::default());
        let spec = BoxSpec::new("Big", 2.0, 1.5, 1.3);

        assert!(!ws.place(&item(0, &spec)));
        assert!(ws.placed().is_empty());
        assert_eq!(ws.anchors().len(), 1);
    }

    #[test]
    fn test_band_workspace() {
        let pallet = pallet();
        let mut ws = Workspace::band(&pallet, &Config::default(), 0.55, 0.75, 990.0);
        let spec = BoxSpec::new("A", 0.4, 0.3, 0.2).with_weight(5.0);

        assert!(ws.place(&item(0, &spec)));
        assert_eq!(ws.placed()[0].position.y, 0.55);
        assert!((ws.max_top() - 0.75).abs() < 1e-9);
        assert!(ws.place(&item(1, &spec)));
        // Carried weight counts against the cap.
        assert!(!ws.place(&item(2, &spec)));
    }

    #[test]
    fn test_place_at_rejects_overlap() {
        let pallet = pallet();
        let mut ws = Workspace::new(&pallet, &Config::default());
        let spec = BoxSpec::new("A", 0.4, 0.3, 0.2);
        let rotation = spec.rotations()[0];

        assert!(ws.place_at(&item(0, &spec), Vector3::new(0.0, 0.15, 0.0), rotation, 0));
        assert!(!ws.place_at(&item(1, &spec), Vector3::new(0.2, 0.15, 0.0), rotation, 0));
        assert!(ws.place_at(&item(1, &spec), Vector3::new(0.4, 0.15, 0.0), rotation, 0));
    }

    #[test]
    fn test_leftover_scoring_available() {
        let pallet = pallet();
        let config = Config::default().with_scoring(PlacementScoring::Leftover);
        let mut ws = Workspace::new(&pallet, &config);
        let spec = BoxSpec::new("A", 0.4, 0.3, 0.2);

        assert!(ws.place(&item(0, &spec)));
        assert!(ws.place(&item(1, &spec)));
        assert_eq!(ws.placed_count(), 2);
        assert!(!ws.placed()[0].overlaps(&ws.placed()[1], config.epsilon));
    }
}
