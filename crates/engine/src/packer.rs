//! Multi-strategy pallet packer.

use crate::boundary::PalletSpec;
use crate::feasibility::check_placements;
use crate::geometry::BoxSpec;
use crate::packing_utils::{expand_boxes, quality_score};
use crate::registry::{StrategyEntry, StrategyRegistry};
use palletpack_core::geometry::{Boundary, Geometry};
use palletpack_core::solver::{Config, ProgressCallback, ProgressInfo, Solver};
use palletpack_core::{Error, PackResult, PackingStatistics, PlacedBox, Result, TrialSummary};
use rayon::prelude::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Outcome of one strategy trial before selection.
struct TrialOutcome {
    placements: Vec<PlacedBox>,
    score: f64,
    skipped: bool,
}

/// Pallet packer: runs every registered strategy on an isolated workspace
/// and keeps the best placement.
#[derive(Debug)]
pub struct Packer {
    pallet: PalletSpec,
    config: Config,
    registry: StrategyRegistry,
    last: Vec<PlacedBox>,
    cancelled: Arc<AtomicBool>,
}

impl Packer {
    /// Creates a packer with the default configuration.
    pub fn new(pallet: PalletSpec) -> Result<Self> {
        Self::with_config(pallet, Config::default())
    }

    /// Creates a packer running the strategies listed in `config`.
    pub fn with_config(pallet: PalletSpec, config: Config) -> Result<Self> {
        let registry = StrategyRegistry::from_strategies(&config.strategies);
        Self::with_registry(pallet, config, registry)
    }

    /// Creates a packer with a custom strategy registry.
    ///
    /// `config.strategies` is ignored; the registry defines what runs.
    pub fn with_registry(
        pallet: PalletSpec,
        config: Config,
        registry: StrategyRegistry,
    ) -> Result<Self> {
        pallet.validate()?;
        config.validate()?;
        if registry.is_empty() {
            return Err(Error::ConfigError(
                "at least one strategy must be registered".into(),
            ));
        }

        Ok(Self {
            pallet,
            config,
            registry,
            last: Vec::new(),
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Returns the pallet.
    pub fn pallet(&self) -> &PalletSpec {
        &self.pallet
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the strategy registry.
    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Packs the given box types and returns the winning placement list.
    ///
    /// Boxes that fit nowhere are left out; only malformed box types are an
    /// error.
    pub fn pack(&mut self, boxes: &[BoxSpec]) -> Result<Vec<PlacedBox>> {
        Ok(self.run(boxes, None)?.placements)
    }

    /// Placements of the most recent run.
    pub fn last_placements(&self) -> &[PlacedBox] {
        &self.last
    }

    /// Weight of the most recent placement.
    pub fn current_weight(&self) -> f64 {
        self.last.iter().map(|p| p.weight).sum()
    }

    /// True if `weight` more would stay within the pallet's cap, given the
    /// most recent placement.
    pub fn can_add_weight(&self, weight: f64) -> bool {
        self.current_weight() + weight <= self.pallet.max_weight()
    }

    /// Utilization of the most recent placement.
    pub fn packing_statistics(&self) -> PackingStatistics {
        PackingStatistics::from_placements(
            &self.last,
            self.pallet.measure(),
            self.pallet.max_weight(),
        )
    }

    /// Shared cancellation flag. Setting it skips trials not yet started.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    fn run(&mut self, boxes: &[BoxSpec], callback: Option<&ProgressCallback>) -> Result<PackResult> {
        for spec in boxes {
            spec.validate()?;
        }

        self.cancelled.store(false, Ordering::Relaxed);
        let start = Instant::now();

        let expanded = expand_boxes(boxes);
        let pallet = self.pallet;
        let region = pallet.load_region();
        let config = &self.config;
        let cancelled = &self.cancelled;
        let entries = self.registry.entries();
        let total_trials = entries.len();

        let run_trial = |trial: usize, entry: &StrategyEntry| -> TrialOutcome {
            if let Some(reason) = stop_reason(cancelled, config, &start) {
                log::warn!("Skipping strategy '{}': {}", entry.name, reason);
                return TrialOutcome {
                    placements: Vec::new(),
                    score: quality_score(&[], &pallet, config.quality),
                    skipped: true,
                };
            }

            let mut placements = (entry.run)(&pallet, &expanded, config);
            if let Err(violation) = check_placements(
                &placements,
                &expanded,
                &region,
                pallet.max_weight(),
                config.epsilon,
            ) {
                log::warn!(
                    "Discarding strategy '{}' placement: {:?}",
                    entry.name,
                    violation
                );
                placements.clear();
            }
            let score = quality_score(&placements, &pallet, config.quality);
            log::debug!(
                "Strategy '{}': placed={}/{}, score={:.6}",
                entry.name,
                placements.len(),
                expanded.len(),
                score
            );

            if let Some(callback) = callback {
                callback(ProgressInfo {
                    trial,
                    total_trials,
                    strategy: entry.name.clone(),
                    placed: placements.len(),
                    score,
                    elapsed_ms: start.elapsed().as_millis() as u64,
                });
            }

            TrialOutcome {
                placements,
                score,
                skipped: false,
            }
        };

        let outcomes: Vec<TrialOutcome> = if config.parallel {
            entries
                .par_iter()
                .enumerate()
                .map(|(i, entry)| run_trial(i, entry))
                .collect()
        } else {
            entries
                .iter()
                .enumerate()
                .map(|(i, entry)| run_trial(i, entry))
                .collect()
        };

        let trials: Vec<TrialSummary> = entries
            .iter()
            .zip(&outcomes)
            .map(|(entry, outcome)| TrialSummary {
                strategy: entry.name.clone(),
                placed: outcome.placements.len(),
                score: outcome.score,
                skipped: outcome.skipped,
            })
            .collect();

        // Strictly greater wins, so ties keep the earliest trial.
        let mut best = 0;
        for (i, outcome) in outcomes.iter().enumerate().skip(1) {
            if outcome.score > outcomes[best].score {
                best = i;
            }
        }

        let any_skipped = outcomes.iter().any(|o| o.skipped);
        let winner_skipped = outcomes[best].skipped;
        let winner_name = trials[best].strategy.clone();
        let score = outcomes[best].score;
        let placements = outcomes
            .into_iter()
            .nth(best)
            .map(|o| o.placements)
            .unwrap_or_default();

        log::info!(
            "Selected strategy '{}': placed={}/{}, score={:.6}",
            winner_name,
            placements.len(),
            expanded.len(),
            score
        );

        let statistics = PackingStatistics::from_placements(
            &placements,
            pallet.measure(),
            pallet.max_weight(),
        );
        let mut result = PackResult {
            placements,
            strategy: None,
            score,
            requested: expanded.len(),
            trials,
            statistics,
            computation_time_ms: start.elapsed().as_millis() as u64,
            cancelled: any_skipped,
        };
        if !winner_skipped {
            result = result.with_strategy(winner_name);
        }

        self.last = result.placements.clone();
        Ok(result)
    }
}

fn stop_reason(cancelled: &AtomicBool, config: &Config, start: &Instant) -> Option<&'static str> {
    if cancelled.load(Ordering::Relaxed) {
        return Some("cancelled");
    }
    if config.time_limit_ms > 0 && start.elapsed().as_millis() as u64 >= config.time_limit_ms {
        return Some("time limit reached");
    }
    None
}

impl Solver for Packer {
    type Item = BoxSpec;

    fn solve(&mut self, items: &[Self::Item]) -> Result<PackResult> {
        self.run(items, None)
    }

    fn solve_with_progress(
        &mut self,
        items: &[Self::Item],
        callback: ProgressCallback,
    ) -> Result<PackResult> {
        self.run(items, Some(&callback))
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}
