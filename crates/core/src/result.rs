//! Pack result representation.

use crate::placement::PlacedBox;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of one strategy trial.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrialSummary {
    /// Strategy name.
    pub strategy: String,
    /// Number of boxes placed by the trial.
    pub placed: usize,
    /// Quality score of the trial.
    pub score: f64,
    /// Whether the trial was skipped (cancellation or time limit).
    pub skipped: bool,
}

/// Utilization figures derived from a placement list and its pallet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackingStatistics {
    /// Loadable volume of the pallet (length × width × load height).
    pub total_volume: f64,
    /// Volume occupied by placed boxes.
    pub used_volume: f64,
    /// `used_volume / total_volume` (0.0 - 1.0).
    pub volume_utilization: f64,
    /// Weight of all placed boxes.
    pub total_weight: f64,
    /// `total_weight / max_weight` (0.0 - 1.0).
    pub weight_utilization: f64,
    /// Number of placed boxes.
    pub package_count: usize,
}

impl PackingStatistics {
    /// Computes statistics; ratios are 0 when their denominator is not positive.
    ///
    /// Sums do not depend on placement order, so two placements of the same
    /// boxes yield bit-identical figures.
    pub fn from_placements(placements: &[PlacedBox], load_volume: f64, max_weight: f64) -> Self {
        let used_volume = ordered_sum(placements.iter().map(PlacedBox::volume));
        let total_weight = ordered_sum(placements.iter().map(|p| p.weight));

        Self {
            total_volume: load_volume,
            used_volume,
            volume_utilization: ratio(used_volume, load_volume),
            total_weight,
            weight_utilization: ratio(total_weight, max_weight),
            package_count: placements.len(),
        }
    }
}

fn ordered_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Result of a packing run.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackResult {
    /// Placements of the winning trial.
    pub placements: Vec<PlacedBox>,

    /// Name of the winning strategy.
    pub strategy: Option<String>,

    /// Quality score of the winning trial.
    pub score: f64,

    /// Number of box instances after repeat-count expansion.
    pub requested: usize,

    /// Per-trial outcomes in evaluation order.
    pub trials: Vec<TrialSummary>,

    /// Utilization of the winning placement.
    pub statistics: PackingStatistics,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,

    /// Whether the run was cancelled or hit its time limit.
    pub cancelled: bool,
}

impl PackResult {
    /// Creates a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of placed box instances.
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// Returns the number of instances left out.
    pub fn unplaced_count(&self) -> usize {
        self.requested.saturating_sub(self.placements.len())
    }

    /// Returns true if every requested instance was placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced_count() == 0
    }

    /// Sets the winning strategy name.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Returns volume utilization as a percentage string.
    pub fn utilization_percent(&self) -> String {
        format!("{:.1}%", self.statistics.volume_utilization * 100.0)
    }
}

/// Display-ready percentages for a pack result, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackSummary {
    /// Instances requested after expansion.
    pub total_requested: usize,
    /// Instances placed.
    pub total_placed: usize,
    /// `placed / requested × 100`.
    pub placement_efficiency: f64,
    /// `used volume / load volume × 100`.
    pub volume_utilization: f64,
    /// `used weight / max weight × 100`.
    pub weight_utilization: f64,
    /// Winning strategy.
    pub strategy: String,
    /// Computation time in milliseconds.
    pub time_ms: u64,
}

impl From<&PackResult> for PackSummary {
    fn from(result: &PackResult) -> Self {
        let placed = result.placements.len();
        Self {
            total_requested: result.requested,
            total_placed: placed,
            placement_efficiency: round2(ratio(placed as f64, result.requested as f64) * 100.0),
            volume_utilization: round2(result.statistics.volume_utilization * 100.0),
            weight_utilization: round2(result.statistics.weight_utilization * 100.0),
            strategy: result
                .strategy
                .clone()
                .unwrap_or_else(|| "none".to_string()),
            time_ms: result.computation_time_ms,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rotation;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn unit_box(instance: usize, x: f64, weight: f64) -> PlacedBox {
        PlacedBox::new(
            "U".to_string(),
            instance,
            Vector3::new(x, 0.0, 0.0),
            Rotation::new(1.0, 1.0, 1.0, 0.0, 0.0, 0.0),
            0,
            weight,
        )
    }

    #[test]
    fn test_result_new() {
        let result = PackResult::new();
        assert!(result.placements.is_empty());
        assert_eq!(result.statistics.volume_utilization, 0.0);
        assert!(result.all_placed());
    }

    #[test]
    fn test_statistics() {
        let placements = vec![unit_box(0, 0.0, 10.0), unit_box(1, 1.0, 30.0)];
        let stats = PackingStatistics::from_placements(&placements, 8.0, 100.0);

        assert_eq!(stats.package_count, 2);
        assert_relative_eq!(stats.used_volume, 2.0);
        assert_relative_eq!(stats.volume_utilization, 0.25);
        assert_relative_eq!(stats.total_weight, 40.0);
        assert_relative_eq!(stats.weight_utilization, 0.4);
    }

    #[test]
    fn test_statistics_ignore_placement_order() {
        let forward = vec![
            unit_box(0, 0.0, 0.1),
            unit_box(1, 1.0, 0.2),
            unit_box(2, 2.0, 0.3),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let a = PackingStatistics::from_placements(&forward, 8.0, 1.0);
        let b = PackingStatistics::from_placements(&backward, 8.0, 1.0);
        assert_eq!(a, b);
        assert_eq!(a.total_weight.to_bits(), b.total_weight.to_bits());
    }

    #[test]
    fn test_statistics_zero_denominators() {
        let stats = PackingStatistics::from_placements(&[], 0.0, 0.0);
        assert_eq!(stats.volume_utilization, 0.0);
        assert_eq!(stats.weight_utilization, 0.0);
        assert_eq!(stats.package_count, 0);
    }

    #[test]
    fn test_summary_rounding() {
        let placements = vec![unit_box(0, 0.0, 1.0)];
        let mut result = PackResult::new().with_strategy("layer");
        result.requested = 3;
        result.statistics = PackingStatistics::from_placements(&placements, 3.0, 7.0);
        result.placements = placements;

        let summary = PackSummary::from(&result);
        assert_eq!(summary.total_placed, 1);
        assert_eq!(summary.placement_efficiency, 33.33);
        assert_eq!(summary.volume_utilization, 33.33);
        assert_eq!(summary.weight_utilization, 14.29);
        assert_eq!(summary.strategy, "layer");
        assert_eq!(result.unplaced_count(), 2);
    }

    #[test]
    fn test_summary_empty_run() {
        let summary = PackSummary::from(&PackResult::new());
        assert_eq!(summary.placement_efficiency, 0.0);
        assert_eq!(summary.volume_utilization, 0.0);
        assert_eq!(summary.strategy, "none");
    }
}
