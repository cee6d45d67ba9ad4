//! Solver traits and configuration.

use crate::geometry::Geometry;
use crate::result::PackResult;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default tolerance used by every geometric predicate, in pallet units.
pub const DEFAULT_EPSILON: f64 = 0.0005;

/// Sort key for the sorted-greedy strategies. All keys sort descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SortKey {
    /// Nominal volume.
    Volume,
    /// Nominal height.
    Height,
    /// Weight.
    Weight,
    /// Nominal footprint (length × width).
    BaseArea,
    /// Weight per unit volume.
    Density,
}

impl SortKey {
    /// All sort keys in evaluation order.
    pub const ALL: [SortKey; 5] = [
        SortKey::Volume,
        SortKey::Height,
        SortKey::Weight,
        SortKey::BaseArea,
        SortKey::Density,
    ];
}

/// Macro packing strategy run as one independent trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Strategy {
    /// Greedy single-box placement over a sorted box list.
    SortedGreedy(SortKey),
    /// Layer by layer, uniform or mixed per layer.
    LayerBased,
    /// Uniform grid of the dominant type, then greedy fill.
    Hybrid,
    /// Best uniform 3D grid among the most common types.
    UniformGrid,
}

impl Strategy {
    /// Returns the stable strategy name.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::SortedGreedy(SortKey::Volume) => "greedy-volume",
            Strategy::SortedGreedy(SortKey::Height) => "greedy-height",
            Strategy::SortedGreedy(SortKey::Weight) => "greedy-weight",
            Strategy::SortedGreedy(SortKey::BaseArea) => "greedy-base-area",
            Strategy::SortedGreedy(SortKey::Density) => "greedy-density",
            Strategy::LayerBased => "layer",
            Strategy::Hybrid => "hybrid",
            Strategy::UniformGrid => "uniform",
        }
    }

    /// Looks a strategy up by its name.
    pub fn from_name(name: &str) -> Option<Strategy> {
        Self::standard_order()
            .into_iter()
            .find(|s| s.name() == name)
    }

    /// The fixed evaluation order. Ties in the quality evaluator keep the
    /// earliest strategy in this list.
    pub fn standard_order() -> Vec<Strategy> {
        let mut order: Vec<Strategy> = SortKey::ALL
            .iter()
            .map(|key| Strategy::SortedGreedy(*key))
            .collect();
        order.push(Strategy::LayerBased);
        order.push(Strategy::Hybrid);
        order.push(Strategy::UniformGrid);
        order
    }

    /// Returns true for the sorted-greedy family.
    pub fn is_greedy(&self) -> bool {
        matches!(self, Strategy::SortedGreedy(_))
    }
}

/// Scoring used by the single-box greedy placer. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PlacementScoring {
    /// Anchor position (low, back, left) plus wasted space to the far
    /// boundaries, with the vertical gap weighted at half.
    #[default]
    Weighted,
    /// Sum of the empty spans above, right of and in front of the box.
    Leftover,
}

/// Comparator used to pick the winning trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum QualityMetric {
    /// `0.5 × volume + 0.3 × count / 1000 + 0.2 × weight` utilization blend.
    #[default]
    Weighted,
    /// Placed count only.
    PlacedCount,
}

/// Common configuration for the packing engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Tolerance for bounds, collision and anchor dedup.
    pub epsilon: f64,

    /// Greedy placement scoring, applied by every strategy of a run.
    pub scoring: PlacementScoring,

    /// Trial comparator.
    pub quality: QualityMetric,

    /// Strategies to run, in evaluation order.
    pub strategies: Vec<Strategy>,

    /// Number of most common box types tried by the uniform grid strategy.
    pub uniform_top_types: usize,

    /// Whether to run trials on the rayon thread pool.
    pub parallel: bool,

    /// Maximum computation time in milliseconds (0 = unlimited).
    pub time_limit_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            scoring: PlacementScoring::default(),
            quality: QualityMetric::default(),
            strategies: Strategy::standard_order(),
            uniform_top_types: 3,
            parallel: true,
            time_limit_ms: 0,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration running only the sorted-greedy family, compared by
    /// placed count.
    pub fn greedy_only() -> Self {
        Self {
            strategies: SortKey::ALL
                .iter()
                .map(|key| Strategy::SortedGreedy(*key))
                .collect(),
            quality: QualityMetric::PlacedCount,
            ..Self::default()
        }
    }

    /// Sets the tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the greedy placement scoring.
    pub fn with_scoring(mut self, scoring: PlacementScoring) -> Self {
        self.scoring = scoring;
        self
    }

    /// Sets the trial comparator.
    pub fn with_quality(mut self, quality: QualityMetric) -> Self {
        self.quality = quality;
        self
    }

    /// Sets the strategies to run.
    pub fn with_strategies(mut self, strategies: Vec<Strategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Sets a single strategy.
    pub fn with_strategy(self, strategy: Strategy) -> Self {
        self.with_strategies(vec![strategy])
    }

    /// Sets how many box types the uniform grid strategy tries.
    pub fn with_uniform_top_types(mut self, n: usize) -> Self {
        self.uniform_top_types = n;
        self
    }

    /// Enables or disables parallel trials.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(Error::ConfigError(format!(
                "epsilon must be finite and positive, got {}",
                self.epsilon
            )));
        }
        if self.uniform_top_types == 0 {
            return Err(Error::ConfigError(
                "uniform_top_types must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Progress callback invoked after each finished trial.
///
/// Trials may finish on worker threads, in any order.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information for one finished trial.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Index of the trial in evaluation order.
    pub trial: usize,
    /// Total number of trials in the run.
    pub total_trials: usize,
    /// Strategy name.
    pub strategy: String,
    /// Number of boxes the trial placed.
    pub placed: usize,
    /// Quality score of the trial.
    pub score: f64,
    /// Elapsed time since the run started, in milliseconds.
    pub elapsed_ms: u64,
}

/// Trait for packing solvers.
pub trait Solver {
    /// The box type this solver handles.
    type Item: Geometry;

    /// Packs the given box types and returns the best placement found.
    fn solve(&mut self, items: &[Self::Item]) -> Result<PackResult>;

    /// Packs with a progress callback.
    fn solve_with_progress(
        &mut self,
        items: &[Self::Item],
        callback: ProgressCallback,
    ) -> Result<PackResult>;

    /// Cancels an ongoing solve operation.
    fn cancel(&self);
}
