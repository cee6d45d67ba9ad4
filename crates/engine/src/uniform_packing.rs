//! Type-focused uniform grid packing.
//!
//! For a single box type, every allowed rotation is tiled as a rows ×
//! layers × columns grid over the whole load region; the rotation that can
//! hold the most of the available instances wins.

use crate::boundary::PalletSpec;
use crate::geometry::ExpandedBox;
use crate::packing_utils::{most_common_types, quality_score, TypeGroup};
use crate::workspace::Workspace;
use nalgebra::Vector3;
use palletpack_core::{Config, PlacedBox, Rotation};

/// A uniform grid of one rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPlan {
    /// Index of `rotation` in the box's orientation set.
    pub rotation_index: usize,
    /// Orientation shared by every cell.
    pub rotation: Rotation,
    /// Cells along x.
    pub nx: usize,
    /// Cells along y (layers).
    pub ny: usize,
    /// Cells along z.
    pub nz: usize,
}

impl GridPlan {
    /// Number of cells, saturating at `usize::MAX` for tiny boxes.
    pub fn capacity(&self) -> usize {
        self.nx.saturating_mul(self.ny).saturating_mul(self.nz)
    }
}

/// Number of `cell`-sized slots along a span, allowing `epsilon` overshoot.
pub(crate) fn fit_count(span: f64, cell: f64, epsilon: f64) -> usize {
    if cell <= 0.0 || span + epsilon < cell {
        return 0;
    }
    ((span + epsilon) / cell).floor() as usize
}

/// Finds the grid that holds the most of `count` instances of `item`
/// within `size` (x, y, z). Ties keep the earlier rotation.
pub fn best_grid(
    item: &ExpandedBox,
    size: &Vector3<f64>,
    count: usize,
    epsilon: f64,
) -> Option<GridPlan> {
    let mut best: Option<(usize, GridPlan)> = None;

    for (rotation_index, rotation) in item.rotations().into_iter().enumerate() {
        let extent = rotation.extent();
        let plan = GridPlan {
            rotation_index,
            rotation,
            nx: fit_count(size.x, extent.x, epsilon),
            ny: fit_count(size.y, extent.y, epsilon),
            nz: fit_count(size.z, extent.z, epsilon),
        };
        let usable = plan.capacity().min(count);
        if usable == 0 {
            continue;
        }
        if best.map_or(true, |(n, _)| usable > n) {
            best = Some((usable, plan));
        }
    }

    best.map(|(_, plan)| plan)
}

/// Fills `plan` bottom-up (layer, then row, then column) with `items`.
///
/// Stops at the first cell the workspace rejects, which with identical
/// boxes only happens once the weight cap is reached. Returns the number of
/// boxes placed.
pub fn fill_grid(workspace: &mut Workspace, plan: &GridPlan, items: &[&ExpandedBox]) -> usize {
    let origin = workspace.region().min;
    let extent = plan.rotation.extent();
    let mut queue = items.iter();
    let mut placed = 0;

    for j in 0..plan.ny {
        for k in 0..plan.nz {
            for i in 0..plan.nx {
                let Some(item) = queue.next() else {
                    return placed;
                };
                let position = origin
                    + Vector3::new(
                        i as f64 * extent.x,
                        j as f64 * extent.y,
                        k as f64 * extent.z,
                    );
                if !workspace.place_at(item, position, plan.rotation, plan.rotation_index) {
                    return placed;
                }
                placed += 1;
            }
        }
    }

    placed
}

/// Builds a fresh workspace holding the best uniform grid of `group`.
pub fn uniform_workspace(pallet: &PalletSpec, config: &Config, group: &TypeGroup<'_>) -> Workspace {
    let mut workspace = Workspace::new(pallet, config);
    let Some(first) = group.boxes.first() else {
        return workspace;
    };

    let region = *workspace.region();
    let size = region.max - region.min;
    if let Some(plan) = best_grid(first, &size, group.len(), config.epsilon) {
        fill_grid(&mut workspace, &plan, &group.boxes);
    }
    workspace
}

/// Tries a uniform grid for each of the most common types and keeps the
/// best scoring one.
pub fn run_uniform_grid(
    pallet: &PalletSpec,
    boxes: &[ExpandedBox],
    config: &Config,
) -> Vec<PlacedBox> {
    let mut best: Option<(f64, Vec<PlacedBox>)> = None;

    for group in most_common_types(boxes, config.uniform_top_types) {
        let placed = uniform_workspace(pallet, config, &group).into_placed();
        if placed.is_empty() {
            continue;
        }
        let score = quality_score(&placed, pallet, config.quality);
        if best.as_ref().map_or(true, |(s, _)| score > *s) {
            best = Some((score, placed));
        }
    }

    best.map(|(_, placed)| placed).unwrap_or_default()
}
