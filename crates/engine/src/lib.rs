//! # palletpack engine
//!
//! 3D pallet loading for the palletpack workspace.
//!
//! The engine expands box types into instances, runs a fixed list of
//! placement strategies on isolated workspaces (optionally in parallel on
//! the rayon pool) and keeps the placement with the best quality score.
//!
//! ## Strategies
//!
//! - **Sorted greedy**: volume, height, weight, base area and density orders
//! - **Layer**: uniform or mixed horizontal layers
//! - **Hybrid**: uniform grid of the dominant type, then greedy fill
//! - **Uniform**: best 3D grid among the most common types
//!
//! ## Example
//!
//! ```
//! use palletpack_engine::{BoxSpec, Packer, PalletSpec};
//!
//! let pallet = PalletSpec::new(1.2, 0.8, 2.0, 1000.0).with_base_height(0.15);
//! let mut packer = Packer::new(pallet).unwrap();
//! let placed = packer
//!     .pack(&[BoxSpec::new("crate", 0.4, 0.3, 0.2).with_weight(5.0).with_quantity(24)])
//!     .unwrap();
//! assert_eq!(placed.len(), 24);
//! ```

pub mod anchor;
pub mod boundary;
pub mod feasibility;
pub mod geometry;
pub mod greedy_packing;
pub mod hybrid_packing;
pub mod layer_packing;
pub mod packer;
pub mod packing_utils;
pub mod registry;
pub mod uniform_packing;
pub mod workspace;

// Re-exports
pub use boundary::{PalletSpec, Region};
pub use geometry::{BoxSpec, ExpandedBox};
pub use packer::Packer;
pub use registry::{StrategyEntry, StrategyFn, StrategyRegistry};
pub use workspace::Workspace;
pub use palletpack_core::{
    Config, Error, PackResult, PackSummary, PackingStatistics, PlacedBox, PlacementScoring,
    QualityMetric, Result, Rotation, RotationClass, SortKey, Solver, Strategy,
};
