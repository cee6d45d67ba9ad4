//! Pack reports: console tables, JSON and CSV output.

use crate::scenario::Scenario;
use palletpack_core::{PackResult, PackSummary, PlacedBox, TrialSummary};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Full report of one packing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackReport {
    /// Scenario name
    pub scenario: String,
    /// Display summary (percentages rounded to 2 decimals)
    pub summary: PackSummary,
    /// Quality score of the winning trial
    pub score: f64,
    /// Per-trial outcomes in evaluation order
    pub trials: Vec<TrialSummary>,
    /// Winning placements
    pub placements: Vec<PlacedBox>,
    /// Whether the run was cut short
    pub cancelled: bool,
}

impl PackReport {
    /// Builds a report from a scenario and its pack result.
    pub fn new(scenario: &Scenario, result: &PackResult) -> Self {
        Self {
            scenario: scenario.name.clone(),
            summary: PackSummary::from(result),
            score: result.score,
            trials: result.trials.clone(),
            placements: result.placements.clone(),
            cancelled: result.cancelled,
        }
    }

    /// Saves the report to a JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Saves the placements to a CSV file.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        self.write_csv(&mut file)
    }

    /// Writes the placements as CSV.
    pub fn write_csv(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(
            out,
            "box_id,instance,x,y,z,length,width,height,rotation_index,weight"
        )?;

        for p in &self.placements {
            writeln!(
                out,
                "{},{},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{},{:.3}",
                p.box_id,
                p.instance,
                p.position.x,
                p.position.y,
                p.position.z,
                p.rotation.length,
                p.rotation.width,
                p.rotation.height,
                p.rotation_index,
                p.weight,
            )?;
        }

        Ok(())
    }

    /// Prints the summary to stdout.
    pub fn print_summary(&self) {
        let s = &self.summary;
        println!("\n{:=<80}", "");
        println!("PACK RESULT: {}", self.scenario);
        println!("{:=<80}", "");
        println!("  Strategy:             {}", s.strategy);
        println!(
            "  Placed:               {} / {} ({:.2}%)",
            s.total_placed, s.total_requested, s.placement_efficiency
        );
        println!("  Volume utilization:   {:.2}%", s.volume_utilization);
        println!("  Weight utilization:   {:.2}%", s.weight_utilization);
        println!("  Score:                {:.6}", self.score);
        println!("  Time:                 {}ms", s.time_ms);
        if self.cancelled {
            println!("  (run cut short, some strategies were skipped)");
        }
        println!("{:=<80}\n", "");
    }

    /// Prints the per-trial table to stdout.
    pub fn print_trials(&self) {
        println!("{:<4} {:<20} {:>8} {:>12} {:>8}", "#", "Strategy", "Placed", "Score", "");
        println!("{:-<56}", "");
        for (i, trial) in self.trials.iter().enumerate() {
            let marker = if trial.skipped {
                "skipped"
            } else if trial.strategy == self.summary.strategy {
                "*"
            } else {
                ""
            };
            println!(
                "{:<4} {:<20} {:>8} {:>12.6} {:>8}",
                i, trial.strategy, trial.placed, trial.score, marker
            );
        }
        println!();
    }
}

/// One line of a strategy comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Strategy name
    pub strategy: String,
    /// Boxes placed
    pub placed: usize,
    /// Boxes requested
    pub requested: usize,
    /// Volume utilization (0.0 - 1.0)
    pub volume_utilization: f64,
    /// Weight utilization (0.0 - 1.0)
    pub weight_utilization: f64,
    /// Quality score
    pub score: f64,
    /// Computation time in milliseconds
    pub time_ms: u64,
}

impl ComparisonRow {
    /// Builds a row from a single-strategy result.
    pub fn from_result(strategy: &str, result: &PackResult) -> Self {
        Self {
            strategy: strategy.to_string(),
            placed: result.placed_count(),
            requested: result.requested,
            volume_utilization: result.statistics.volume_utilization,
            weight_utilization: result.statistics.weight_utilization,
            score: result.score,
            time_ms: result.computation_time_ms,
        }
    }
}

/// Index of the best row: strictly higher score wins, ties keep the first.
pub fn best_row(rows: &[ComparisonRow]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, row) in rows.iter().enumerate() {
        if best.map_or(true, |b| row.score > rows[b].score) {
            best = Some(i);
        }
    }
    best
}

/// Prints a strategy comparison table to stdout.
pub fn print_comparison(scenario: &str, rows: &[ComparisonRow]) {
    println!("\n{:=<90}", "");
    println!("STRATEGY COMPARISON: {}", scenario);
    println!("{:=<90}", "");
    println!(
        "{:<20} {:>10} {:>10} {:>10} {:>12} {:>10}",
        "Strategy", "Placed", "Vol%", "Weight%", "Score", "Time(ms)"
    );
    println!("{:-<90}", "");

    let best = best_row(rows);
    for (i, row) in rows.iter().enumerate() {
        println!(
            "{:<20} {:>10} {:>10.1} {:>10.1} {:>12.6} {:>10}{}",
            row.strategy,
            format!("{}/{}", row.placed, row.requested),
            row.volume_utilization * 100.0,
            row.weight_utilization * 100.0,
            row.score,
            row.time_ms,
            if best == Some(i) { "  *" } else { "" }
        );
    }

    println!("{:=<90}\n", "");
}
