//! Shared utilities for the strategy runners.
//!
//! # Extracted Components
//!
//! - [`expand_boxes`]: Expands box types into singleton instances
//! - [`group_by_type`] / [`most_common_types`]: Type grouping for the layer,
//!   hybrid and uniform strategies
//! - [`sort_boxes`]: Stable descending sort used by the sorted-greedy family
//! - [`quality_score`]: Trial comparator
//! - [`layer_efficiency`]: Per-layer plan score

use crate::boundary::PalletSpec;
use crate::geometry::{BoxSpec, ExpandedBox};
use palletpack_core::geometry::{Boundary, Geometry};
use palletpack_core::{PackingStatistics, PlacedBox, QualityMetric, SortKey};
use std::cmp::Ordering;

/// Weight of volume utilization in [`QualityMetric::Weighted`].
const QUALITY_VOLUME_WEIGHT: f64 = 0.5;
/// Weight of the normalized placed count.
const QUALITY_COUNT_WEIGHT: f64 = 0.3;
/// Placed count normalizer.
const QUALITY_COUNT_SCALE: f64 = 1000.0;
/// Weight of weight utilization.
const QUALITY_WEIGHT_WEIGHT: f64 = 0.2;

const LAYER_VOLUME_WEIGHT: f64 = 0.7;
const LAYER_COUNT_WEIGHT: f64 = 0.3;

/// Expands every box type by its quantity.
///
/// Instance ids are assigned sequentially in input order, so they are unique
/// within the run.
pub fn expand_boxes(specs: &[BoxSpec]) -> Vec<ExpandedBox> {
    let mut boxes = Vec::with_capacity(specs.iter().map(|s| s.quantity()).sum());
    for (type_index, spec) in specs.iter().enumerate() {
        for _ in 0..spec.quantity() {
            let instance = boxes.len();
            boxes.push(ExpandedBox::from_spec(spec, type_index, instance));
        }
    }
    boxes
}

/// Expanded instances of one box type.
#[derive(Debug, Clone)]
pub struct TypeGroup<'a> {
    /// Index of the box type in the input list.
    pub type_index: usize,
    /// Instances in expansion order.
    pub boxes: Vec<&'a ExpandedBox>,
}

impl TypeGroup<'_> {
    /// Number of instances.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Returns true if the group has no instances.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Groups boxes by type, in order of first appearance.
pub fn group_by_type<'a, I>(boxes: I) -> Vec<TypeGroup<'a>>
where
    I: IntoIterator<Item = &'a ExpandedBox>,
{
    let mut groups: Vec<TypeGroup<'a>> = Vec::new();
    for item in boxes {
        match groups.iter_mut().find(|g| g.type_index == item.type_index) {
            Some(group) => group.boxes.push(item),
            None => groups.push(TypeGroup {
                type_index: item.type_index,
                boxes: vec![item],
            }),
        }
    }
    groups
}

/// Returns the `n` most numerous type groups, largest first.
///
/// Equal counts keep first-appearance order.
pub fn most_common_types(boxes: &[ExpandedBox], n: usize) -> Vec<TypeGroup<'_>> {
    let mut groups = group_by_type(boxes);
    groups.sort_by(|a, b| b.len().cmp(&a.len()));
    groups.truncate(n);
    groups
}

/// Sorts boxes descending by `key`. The sort is stable.
pub fn sort_boxes(boxes: &[ExpandedBox], key: SortKey) -> Vec<&ExpandedBox> {
    let mut sorted: Vec<&ExpandedBox> = boxes.iter().collect();
    sorted.sort_by(|a, b| compare_desc(sort_value(a, key), sort_value(b, key)));
    sorted
}

fn sort_value(item: &ExpandedBox, key: SortKey) -> f64 {
    match key {
        SortKey::Volume => item.volume(),
        SortKey::Height => item.height(),
        SortKey::Weight => item.weight,
        SortKey::BaseArea => item.base_area(),
        SortKey::Density => item.density(),
    }
}

fn compare_desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Scores a full placement for trial selection. Higher is better.
pub fn quality_score(placements: &[PlacedBox], pallet: &PalletSpec, metric: QualityMetric) -> f64 {
    match metric {
        QualityMetric::PlacedCount => placements.len() as f64,
        QualityMetric::Weighted => {
            let stats =
                PackingStatistics::from_placements(placements, pallet.measure(), pallet.max_weight());
            QUALITY_VOLUME_WEIGHT * stats.volume_utilization
                + QUALITY_COUNT_WEIGHT * (stats.package_count as f64 / QUALITY_COUNT_SCALE)
                + QUALITY_WEIGHT_WEIGHT * stats.weight_utilization
        }
    }
}

/// Scores one candidate layer starting at `floor`.
///
/// `0.7 × volume fraction + 0.3 × count fraction`, both measured against the
/// slab between `floor` and the plan's highest top. The count fraction uses
/// the number of the plan's smallest box that would fill the slab.
pub fn layer_efficiency(plan: &[PlacedBox], pallet: &PalletSpec, floor: f64) -> f64 {
    if plan.is_empty() {
        return 0.0;
    }

    let ceiling = plan.iter().map(PlacedBox::top).fold(floor, f64::max);
    let layer_volume = pallet.footprint() * (ceiling - floor);
    if layer_volume <= 0.0 {
        return 0.0;
    }

    let used: f64 = plan.iter().map(PlacedBox::volume).sum();
    let smallest = plan
        .iter()
        .map(PlacedBox::volume)
        .fold(f64::INFINITY, f64::min);
    let max_count = (layer_volume / smallest + 1e-9).floor().max(1.0);

    let volume_fraction = used / layer_volume;
    let count_fraction = (plan.len() as f64 / max_count).min(1.0);
    LAYER_VOLUME_WEIGHT * volume_fraction + LAYER_COUNT_WEIGHT * count_fraction
}
