//! # palletpack core
//!
//! Shared types and traits for the palletpack loading engine.
//!
//! ## Core Components
//!
//! - **Rotation model**: `RotationClass` and the concrete `Rotation` set it enumerates
//! - **Geometry traits**: `Geometry` for box types, `Boundary` for containers
//! - **Placement**: `PlacedBox`, the immutable output unit of every strategy
//! - **Results**: `PackResult`, `PackingStatistics` and the display `PackSummary`
//! - **Solver trait**: common interface and `Config` for the engine
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod error;
pub mod geometry;
pub mod placement;
pub mod result;
pub mod solver;

// Re-exports
pub use error::{Error, Result};
pub use geometry::{Boundary, Geometry, GeometryId, Rotation, RotationClass};
pub use placement::PlacedBox;
pub use result::{PackResult, PackSummary, PackingStatistics, TrialSummary};
pub use solver::{
    Config, PlacementScoring, ProgressCallback, ProgressInfo, QualityMetric, SortKey, Solver,
    Strategy, DEFAULT_EPSILON,
};
