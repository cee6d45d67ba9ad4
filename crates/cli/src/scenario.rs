//! Loading scenarios: a pallet plus the package list to put on it.

use palletpack_core::geometry::{Boundary, Geometry};
use palletpack_engine::{BoxSpec, PalletSpec};
use serde::{Deserialize, Serialize};

/// Information about a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioInfo {
    /// Scenario name
    pub name: String,
    /// Number of package types
    pub package_types: usize,
    /// Total boxes when quantities are expanded
    pub total_boxes: usize,
    /// Total nominal volume of all boxes
    pub total_box_volume: f64,
    /// Total weight of all boxes
    pub total_box_weight: f64,
    /// Loadable volume of the pallet
    pub load_volume: f64,
    /// Pallet weight cap
    pub max_weight: f64,
}

/// A parsed scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Scenario name
    pub name: String,
    /// Pallet to load
    pub pallet: PalletSpec,
    /// Package types in input order
    pub packages: Vec<BoxSpec>,
}

impl Scenario {
    /// Number of boxes after quantity expansion.
    pub fn total_boxes(&self) -> usize {
        self.packages.iter().map(|p| p.quantity()).sum()
    }

    /// Returns scenario information.
    pub fn info(&self) -> ScenarioInfo {
        ScenarioInfo {
            name: self.name.clone(),
            package_types: self.packages.len(),
            total_boxes: self.total_boxes(),
            total_box_volume: self
                .packages
                .iter()
                .map(|p| p.measure() * p.quantity() as f64)
                .sum(),
            total_box_weight: self
                .packages
                .iter()
                .map(|p| p.weight() * p.quantity() as f64)
                .sum(),
            load_volume: self.pallet.measure(),
            max_weight: self.pallet.max_weight(),
        }
    }

    /// Prints the scenario header.
    pub fn print_info(&self) {
        let info = self.info();
        println!("Scenario: {}", info.name);
        println!(
            "  Pallet: {} x {} (base {}), load height {}, max weight {}",
            self.pallet.length(),
            self.pallet.width(),
            self.pallet.base_height(),
            self.pallet.load_height(),
            info.max_weight
        );
        println!(
            "  Packages: {} types, {} boxes, {:.3} volume ({:.1}% of load volume), {:.1} weight",
            info.package_types,
            info.total_boxes,
            info.total_box_volume,
            if info.load_volume > 0.0 {
                info.total_box_volume / info.load_volume * 100.0
            } else {
                0.0
            },
            info.total_box_weight
        );
    }
}
