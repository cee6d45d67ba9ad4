//! Scenario JSON parser.

use crate::scenario::Scenario;
use palletpack_core::geometry::{Boundary, Geometry};
use palletpack_core::RotationClass;
use palletpack_engine::{BoxSpec, PalletSpec};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when parsing scenarios.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid scenario format: {0}")]
    InvalidFormat(String),
}

/// Parser for scenario files.
#[derive(Debug, Default)]
pub struct ScenarioParser;

impl ScenarioParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses a scenario from a JSON file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Scenario, ParseError> {
        let content = fs::read_to_string(path)?;
        self.parse_json(&content)
    }

    /// Parses a scenario from a JSON string.
    pub fn parse_json(&self, json: &str) -> Result<Scenario, ParseError> {
        let raw: RawScenario = serde_json::from_str(json)?;
        self.convert_raw_scenario(raw)
    }

    /// Converts a raw scenario to our format.
    fn convert_raw_scenario(&self, raw: RawScenario) -> Result<Scenario, ParseError> {
        let pallet = self.convert_raw_pallet(raw.pallet)?;

        let mut seen = HashSet::new();
        let mut packages = Vec::with_capacity(raw.packages.len());
        for package in raw.packages {
            if !seen.insert(package.id.clone()) {
                return Err(ParseError::InvalidFormat(format!(
                    "duplicate package id '{}'",
                    package.id
                )));
            }
            packages.push(self.convert_raw_package(package)?);
        }

        Ok(Scenario {
            name: raw.name,
            pallet,
            packages,
        })
    }

    fn convert_raw_pallet(&self, raw: RawPallet) -> Result<PalletSpec, ParseError> {
        let pallet = PalletSpec::new(raw.length, raw.width, raw.load_height, raw.max_weight)
            .with_base_height(raw.base_height);
        pallet
            .validate()
            .map_err(|e| ParseError::InvalidFormat(e.to_string()))?;
        Ok(pallet)
    }

    fn convert_raw_package(&self, raw: RawPackage) -> Result<BoxSpec, ParseError> {
        if raw.id.trim().is_empty() {
            return Err(ParseError::InvalidFormat("package id is empty".into()));
        }

        let spec = BoxSpec::new(raw.id, raw.length, raw.width, raw.height)
            .with_weight(raw.weight)
            .with_quantity(raw.quantity)
            .with_rotation_class(parse_rotation(&raw.rotation)?);
        spec.validate()
            .map_err(|e| ParseError::InvalidFormat(e.to_string()))?;
        Ok(spec)
    }
}

/// Maps a rotation label to its class.
///
/// Accepts the short labels (`vertical`, `horizontal`, `all`) as well as the
/// class names.
pub fn parse_rotation(label: &str) -> Result<RotationClass, ParseError> {
    match label.trim().to_ascii_lowercase().as_str() {
        "vertical" | "fixed" | "fixed-orientation" => Ok(RotationClass::FixedOrientation),
        "horizontal" | "two-way" => Ok(RotationClass::TwoWay),
        "all" | "six-way" => Ok(RotationClass::SixWay),
        other => Err(ParseError::InvalidFormat(format!(
            "unknown rotation '{}'",
            other
        ))),
    }
}

fn default_rotation() -> String {
    "all".to_string()
}

fn default_quantity() -> usize {
    1
}

/// Raw scenario as parsed from JSON.
#[derive(Debug, Deserialize)]
struct RawScenario {
    #[serde(default)]
    name: String,
    pallet: RawPallet,
    #[serde(default)]
    packages: Vec<RawPackage>,
}

/// Raw pallet as parsed from JSON.
#[derive(Debug, Deserialize)]
struct RawPallet {
    length: f64,
    width: f64,
    #[serde(default)]
    base_height: f64,
    load_height: f64,
    max_weight: f64,
}

/// Raw package as parsed from JSON.
#[derive(Debug, Deserialize)]
struct RawPackage {
    id: String,
    length: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    weight: f64,
    #[serde(default = "default_rotation")]
    rotation: String,
    #[serde(default = "default_quantity")]
    quantity: usize,
}
