//! Strategy registry.
//!
//! Every strategy is a pure function from the pallet, the expanded box list
//! and the run configuration to a full placement list. The registry keeps
//! them in evaluation order; that order is the tie-break of the quality
//! evaluator.

use crate::boundary::PalletSpec;
use crate::geometry::ExpandedBox;
use crate::greedy_packing::run_sorted_greedy;
use crate::hybrid_packing::run_hybrid;
use crate::layer_packing::run_layer_based;
use crate::uniform_packing::run_uniform_grid;
use palletpack_core::{Config, PlacedBox, Strategy};
use std::fmt;
use std::sync::Arc;

/// A pluggable packing strategy.
pub type StrategyFn =
    Arc<dyn Fn(&PalletSpec, &[ExpandedBox], &Config) -> Vec<PlacedBox> + Send + Sync>;

/// A named strategy.
#[derive(Clone)]
pub struct StrategyEntry {
    /// Name reported in results and progress.
    pub name: String,
    /// The strategy itself.
    pub run: StrategyFn,
}

impl fmt::Debug for StrategyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyEntry")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Returns the runner for a built-in strategy.
pub fn strategy_fn(strategy: Strategy) -> StrategyFn {
    match strategy {
        Strategy::SortedGreedy(key) => Arc::new(
            move |pallet: &PalletSpec, boxes: &[ExpandedBox], config: &Config| {
                run_sorted_greedy(pallet, boxes, config, key)
            },
        ),
        Strategy::LayerBased => Arc::new(run_layer_based),
        Strategy::Hybrid => Arc::new(run_hybrid),
        Strategy::UniformGrid => Arc::new(run_uniform_grid),
    }
}

/// Ordered list of strategies to evaluate.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    entries: Vec<StrategyEntry>,
}

impl StrategyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in strategies in standard evaluation order.
    pub fn standard() -> Self {
        Self::from_strategies(&Strategy::standard_order())
    }

    /// Registers the given built-in strategies in order.
    pub fn from_strategies(strategies: &[Strategy]) -> Self {
        let mut registry = Self::new();
        for strategy in strategies {
            registry.push(strategy.name().to_string(), strategy_fn(*strategy));
        }
        registry
    }

    /// Appends a caller-supplied strategy.
    pub fn register<F>(&mut self, name: impl Into<String>, run: F)
    where
        F: Fn(&PalletSpec, &[ExpandedBox], &Config) -> Vec<PlacedBox> + Send + Sync + 'static,
    {
        self.push(name.into(), Arc::new(run));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_strategy<F>(mut self, name: impl Into<String>, run: F) -> Self
    where
        F: Fn(&PalletSpec, &[ExpandedBox], &Config) -> Vec<PlacedBox> + Send + Sync + 'static,
    {
        self.register(name, run);
        self
    }

    fn push(&mut self, name: String, run: StrategyFn) {
        self.entries.push(StrategyEntry { name, run });
    }

    /// Number of strategies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no strategy is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in evaluation order.
    pub fn entries(&self) -> &[StrategyEntry] {
        &self.entries
    }

    /// Strategy names in evaluation order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}
