//! Budget-constrained geographic minimum spanning forest.
//!
//! The crate computes a planar (non-self-crossing) minimum spanning forest
//! over a set of geo-located demand nodes. Each node carries a scalar
//! *budget*; an edge may only be accepted while both endpoint components
//! retain enough aggregated budget to pay for the edge's haversine length.
//! The algorithm is a modified Borůvka: per round, every component finds
//! its cheapest foreign-nearest-neighbour edge, and candidates are
//! committed in priority order subject to budget, cycle, and planarity
//! checks.
//!
//! # Basic usage
//! ```
//! use boruvka_core::{build_forest, Coordinate, EngineConfig};
//! use std::collections::HashMap;
//!
//! let mut coords = HashMap::new();
//! coords.insert(0u64, Coordinate::new(0.0, 0.0));
//! coords.insert(1u64, Coordinate::new(0.01, 0.0));
//!
//! let mut budgets = HashMap::new();
//! budgets.insert(0u64, 1.0e7);
//! budgets.insert(1u64, 1.0e7);
//!
//! let edges = build_forest(vec![0, 1], coords, budgets, None, None, &EngineConfig::default())
//!     .expect("valid input");
//! assert_eq!(edges.len(), 1);
//! ```
//!
//! [`build_forest`]: crate::engine::build_forest

pub mod constants;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod geometry_guard;
pub mod partition;
pub mod queue;
pub mod spatial_index;
pub mod types;
pub mod util;

pub use constants::{NodeId, Weight};
pub use engine::{build_forest, check_anchor_consistency, BoruvkaEngine, EngineConfig};
pub use error::{BoruvkaError, InvalidInputReason};
pub use partition::DisjointPartition;
pub use types::{AcceptedEdge, Coordinate};
