//! Sorted-greedy strategy family.

use crate::boundary::PalletSpec;
use crate::geometry::ExpandedBox;
use crate::packing_utils::sort_boxes;
use crate::workspace::Workspace;
use palletpack_core::{Config, PlacedBox, SortKey};

/// Sorts the boxes by `key` and places them one by one with the greedy placer.
///
/// Boxes that would breach the weight cap or fit nowhere are skipped; later,
/// lighter or smaller boxes may still be placed.
pub fn run_sorted_greedy(
    pallet: &PalletSpec,
    boxes: &[ExpandedBox],
    config: &Config,
    key: SortKey,
) -> Vec<PlacedBox> {
    let mut workspace = Workspace::new(pallet, config);
    for item in sort_boxes(boxes, key) {
        workspace.place(item);
    }
    workspace.into_placed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoxSpec;
    use crate::packing_utils::expand_boxes;

    fn pallet() -> PalletSpec {
        PalletSpec::new(1.2, 0.8, 2.0, 1000.0).with_base_height(0.15)
    }

    #[test]
    fn test_places_everything_that_fits() {
        let boxes = expand_boxes(&[BoxSpec::new("A", 0.4, 0.3, 0.2)
            .with_weight(5.0)
            .with_quantity(12)]);
        let placed = run_sorted_greedy(&pallet(), &boxes, &Config::default(), SortKey::Volume);
        assert_eq!(placed.len(), 12);
    }

    #[test]
    fn test_heavy_box_skipped_lighter_kept() {
        let pallet = PalletSpec::new(1.2, 0.8, 2.0, 50.0);
        let boxes = expand_boxes(&[
            BoxSpec::new("heavy", 0.4, 0.4, 0.4).with_weight(40.0).with_quantity(2),
            BoxSpec::new("light", 0.2, 0.2, 0.2).with_weight(5.0).with_quantity(2),
        ]);
        let placed = run_sorted_greedy(&pallet, &boxes, &Config::default(), SortKey::Weight);

        let ids: Vec<&str> = placed.iter().map(|p| p.box_id.as_str()).collect();
        assert_eq!(ids, vec!["heavy", "light", "light"]);
    }

    #[test]
    fn test_volume_order_places_large_first() {
        let boxes = expand_boxes(&[
            BoxSpec::new("small", 0.2, 0.2, 0.2),
            BoxSpec::new("large", 0.6, 0.4, 0.4),
        ]);
        let placed = run_sorted_greedy(&pallet(), &boxes, &Config::default(), SortKey::Volume);
        assert_eq!(placed[0].box_id, "large");
        assert_eq!(placed[0].position.y, 0.15);
    }
}
