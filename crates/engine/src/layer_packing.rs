//! Layer-based packing.
//!
//! The load is built as a stack of horizontal layers. Each layer starts at
//! the highest top reached so far and is chosen among two kinds of plans:
//!
//! - a uniform tiling of one remaining box type in one rotation
//! - a mixed layer, where all remaining boxes are placed greedily inside a
//!   height band
//!
//! The plan with the best [`layer_efficiency`] is committed. Packing stops
//! when no plan places anything or the load height is used up.

use crate::boundary::PalletSpec;
use crate::geometry::ExpandedBox;
use crate::packing_utils::{group_by_type, layer_efficiency, TypeGroup};
use crate::uniform_packing::fit_count;
use crate::workspace::Workspace;
use nalgebra::Vector3;
use palletpack_core::{Config, PlacedBox};
use std::collections::HashSet;

/// Tiles one layer with a single type in each of its rotations.
///
/// Returns one plan per rotation whose height fits above `floor`. Cells are
/// filled row by row (z outer, x inner), capped by the instances available
/// and by the weight left under the cap.
pub fn uniform_layer_plans(
    pallet: &PalletSpec,
    config: &Config,
    group: &TypeGroup<'_>,
    floor: f64,
    carried_weight: f64,
) -> Vec<Vec<PlacedBox>> {
    let Some(first) = group.boxes.first() else {
        return Vec::new();
    };

    let mut plans = Vec::new();
    for (rotation_index, rotation) in first.rotations().into_iter().enumerate() {
        if floor + rotation.height > pallet.top() + config.epsilon {
            continue;
        }
        let extent = rotation.extent();
        let nx = fit_count(pallet.length(), extent.x, config.epsilon);
        let nz = fit_count(pallet.width(), extent.z, config.epsilon);

        let mut weight = carried_weight;
        let mut plan = Vec::new();
        let mut queue = group.boxes.iter();
        'rows: for k in 0..nz {
            for i in 0..nx {
                let Some(item) = queue.next() else {
                    break 'rows;
                };
                if weight + item.weight > pallet.max_weight() {
                    break 'rows;
                }
                weight += item.weight;
                plan.push(PlacedBox::new(
                    item.box_id.clone(),
                    item.instance,
                    Vector3::new(i as f64 * extent.x, floor, k as f64 * extent.z),
                    rotation,
                    rotation_index,
                    item.weight,
                ));
            }
        }

        if !plan.is_empty() {
            plans.push(plan);
        }
    }
    plans
}

/// Places all remaining boxes greedily within one height band above `floor`.
///
/// The band is as tall as the largest minimal height among the remaining
/// boxes, clipped to the load height. Boxes are tried in descending volume.
pub fn mixed_layer_plan(
    pallet: &PalletSpec,
    config: &Config,
    remaining: &[&ExpandedBox],
    floor: f64,
    carried_weight: f64,
) -> Vec<PlacedBox> {
    let band = remaining
        .iter()
        .map(|b| b.min_height())
        .fold(0.0, f64::max)
        .min(pallet.top() - floor);
    if band <= 0.0 {
        return Vec::new();
    }

    let mut ordered: Vec<&ExpandedBox> = remaining.to_vec();
    ordered.sort_by(|a, b| b.volume().total_cmp(&a.volume()));

    let mut workspace = Workspace::band(pallet, config, floor, floor + band, carried_weight);
    for item in ordered {
        workspace.place(item);
    }
    workspace.into_placed()
}

/// Picks the most efficient layer plan above `floor`.
///
/// Uniform plans are evaluated first, in type and rotation order, then the
/// mixed plan; a later plan must score strictly higher to win.
pub fn best_layer(
    pallet: &PalletSpec,
    config: &Config,
    remaining: &[&ExpandedBox],
    floor: f64,
    carried_weight: f64,
) -> Option<(f64, Vec<PlacedBox>)> {
    let mut best: Option<(f64, Vec<PlacedBox>)> = None;
    let mut consider = |plan: Vec<PlacedBox>| {
        if plan.is_empty() {
            return;
        }
        let efficiency = layer_efficiency(&plan, pallet, floor);
        if best.as_ref().map_or(true, |(e, _)| efficiency > *e) {
            best = Some((efficiency, plan));
        }
    };

    for group in group_by_type(remaining.iter().copied()) {
        for plan in uniform_layer_plans(pallet, config, &group, floor, carried_weight) {
            consider(plan);
        }
    }
    consider(mixed_layer_plan(pallet, config, remaining, floor, carried_weight));

    best
}

/// Builds the load layer by layer.
pub fn run_layer_based(
    pallet: &PalletSpec,
    boxes: &[ExpandedBox],
    config: &Config,
) -> Vec<PlacedBox> {
    let mut workspace = Workspace::new(pallet, config);
    let mut remaining: Vec<&ExpandedBox> = boxes.iter().collect();
    let mut floor = pallet.base_height();
    let mut layer = 0usize;

    while !remaining.is_empty() && floor + config.epsilon < pallet.top() {
        let Some((efficiency, plan)) =
            best_layer(pallet, config, &remaining, floor, workspace.current_weight())
        else {
            break;
        };

        let mut committed = HashSet::new();
        for placed in plan {
            let instance = placed.instance;
            if workspace.place_placed(placed) {
                committed.insert(instance);
            }
        }
        if committed.is_empty() {
            break;
        }
        remaining.retain(|b| !committed.contains(&b.instance));

        let next = workspace.max_top();
        log::debug!(
            "Layer {}: floor={:.4}, top={:.4}, boxes={}, efficiency={:.4}",
            layer,
            floor,
            next,
            committed.len(),
            efficiency
        );
        if next <= floor + config.epsilon {
            break;
        }
        floor = next;
        layer += 1;
    }

    workspace.into_placed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoxSpec;
    use crate::packing_utils::expand_boxes;
    use palletpack_core::RotationClass;

    fn pallet() -> PalletSpec {
        PalletSpec::new(1.2, 0.8, 2.0, 1000.0).with_base_height(0.15)
    }

    #[test]
    fn test_uniform_layer_plans() {
        let boxes = expand_boxes(&[BoxSpec::new("A", 0.4, 0.4, 0.2)
            .with_rotation_class(RotationClass::FixedOrientation)
            .with_quantity(10)]);
        let refs: Vec<&ExpandedBox> = boxes.iter().collect();
        let groups = group_by_type(refs.iter().copied());

        let plans = uniform_layer_plans(&pallet(), &Config::default(), &groups[0], 0.15, 0.0);
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].len(), 6);
        assert!(plans[0].iter().all(|p| p.position.y == 0.15));
    }

    #[test]
    fn test_uniform_layer_respects_weight() {
        let boxes = expand_boxes(&[BoxSpec::new("A", 0.4, 0.4, 0.2)
            .with_weight(100.0)
            .with_rotation_class(RotationClass::FixedOrientation)
            .with_quantity(10)]);
        let groups = group_by_type(&boxes);

        let plans = uniform_layer_plans(&pallet(), &Config::default(), &groups[0], 0.15, 750.0);
        assert_eq!(plans[0].len(), 2);
    }

    #[test]
    fn test_uniform_layer_skips_rotations_above_top() {
        let boxes = expand_boxes(&[BoxSpec::new("A", 0.4, 0.3, 0.2)]);
        let groups = group_by_type(&boxes);

        // 0.3 of headroom: only rotations with height 0.2 or 0.3 remain.
        let plans = uniform_layer_plans(&pallet(), &Config::default(), &groups[0], 1.85, 0.0);
        assert_eq!(plans.len(), 4);
        assert!(plans
            .iter()
            .all(|plan| plan[0].rotation.height <= 0.3 + 1e-9));
    }

    #[test]
    fn test_mixed_layer_stays_in_band() {
        let boxes = expand_boxes(&[
            BoxSpec::new("flat", 0.6, 0.4, 0.2)
                .with_rotation_class(RotationClass::TwoWay)
                .with_quantity(2),
            BoxSpec::new("post", 0.2, 0.2, 0.3)
                .with_rotation_class(RotationClass::FixedOrientation)
                .with_quantity(3),
        ]);
        let refs: Vec<&ExpandedBox> = boxes.iter().collect();

        let plan = mixed_layer_plan(&pallet(), &Config::default(), &refs, 0.15, 0.0);
        assert_eq!(plan.len(), 5);
        assert!(plan.iter().all(|p| p.top() <= 0.45 + 1e-9));
    }

    #[test]
    fn test_layers_stack_up() {
        let boxes = expand_boxes(&[BoxSpec::new("A", 0.4, 0.3, 0.2)
            .with_weight(5.0)
            .with_quantity(24)]);
        let placed = run_layer_based(&pallet(), &boxes, &Config::default());

        assert_eq!(placed.len(), 24);
        assert!(placed.iter().all(|p| p.top() <= 2.15 + 1e-9));
    }

    #[test]
    fn test_layer_stops_when_nothing_fits() {
        let boxes = expand_boxes(&[BoxSpec::new("Big", 2.0, 1.5, 1.3).with_quantity(2)]);
        assert!(run_layer_based(&pallet(), &boxes, &Config::default()).is_empty());
    }
}
