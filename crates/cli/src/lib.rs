//! Scenario runner for palletpack
//!
//! This crate provides:
//! - JSON scenario parser (pallet plus package list)
//! - Pack reports with console tables, JSON and CSV output
//! - Strategy comparison rows

mod parser;
mod report;
mod scenario;

pub use parser::{parse_rotation, ParseError, ScenarioParser};
pub use report::{best_row, print_comparison, ComparisonRow, PackReport};
pub use scenario::{Scenario, ScenarioInfo};
