//! Hybrid packing: uniform grid of the dominant type, then greedy fill.

use crate::boundary::PalletSpec;
use crate::geometry::ExpandedBox;
use crate::packing_utils::most_common_types;
use crate::uniform_packing::uniform_workspace;
use crate::workspace::Workspace;
use palletpack_core::{Config, PlacedBox};
use std::collections::HashSet;

/// Seeds the load with the best uniform grid of the most numerous type, then
/// places every remaining box greedily into the leftover anchors.
///
/// Instances of the dominant type that did not fit the grid are retried in
/// the greedy pass alongside the other types, in descending volume order.
pub fn run_hybrid(pallet: &PalletSpec, boxes: &[ExpandedBox], config: &Config) -> Vec<PlacedBox> {
    let mut workspace = match most_common_types(boxes, 1).first() {
        Some(dominant) => uniform_workspace(pallet, config, dominant),
        None => return Vec::new(),
    };

    let seeded: HashSet<usize> = workspace.placed().iter().map(|p| p.instance).collect();
    let mut rest: Vec<&ExpandedBox> = boxes
        .iter()
        .filter(|b| !seeded.contains(&b.instance))
        .collect();
    rest.sort_by(|a, b| b.volume().total_cmp(&a.volume()));

    fill_greedy(&mut workspace, &rest);
    workspace.into_placed()
}

fn fill_greedy(workspace: &mut Workspace, items: &[&ExpandedBox]) {
    for item in items {
        workspace.place(item);
    }
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
    fn test_hybrid_seeds_dominant_type() {
        let boxes = expand_boxes(&[
            BoxSpec::new("filler", 0.2, 0.2, 0.2).with_quantity(2),
            BoxSpec::new("main", 0.4, 0.3, 0.2)
                .with_weight(5.0)
                .with_quantity(10),
        ]);
        let placed = run_hybrid(&pallet(), &boxes, &Config::default());

        assert_eq!(placed.len(), 12);
        // The grid comes first.
        assert!(placed[..10].iter().all(|p| p.box_id == "main"));
        assert!(placed[10..].iter().all(|p| p.box_id == "filler"));
    }

    #[test]
    fn test_hybrid_empty_input() {
        assert!(run_hybrid(&pallet(), &[], &Config::default()).is_empty());
    }
}
