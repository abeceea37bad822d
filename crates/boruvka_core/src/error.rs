//! Error type for the Borůvka engine.
//!
//! `boruvka_core` is a library with no application boundary of its own, so
//! it exposes a typed `thiserror` enum rather than `anyhow` (the pack
//! convention `butterfly-route` documents explicitly: `anyhow` at the
//! application boundary, `thiserror` in library code).

use thiserror::Error;

use crate::constants::NodeId;

/// Sub-reason for [`BoruvkaError::InvalidInput`].
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidInputReason {
    /// The same node id appeared twice in `V`.
    DuplicateNode(NodeId),
    /// A node's coordinate lies outside `[-180, 180]` longitude or `[-90, 90]` latitude.
    CoordinateOutOfRange { node: NodeId, lon: f64, lat: f64 },
    /// A node's budget is negative (NaN counts as negative: it can never be compared against a length).
    NegativeBudget { node: NodeId, budget: f64 },
    /// `coords` or `budgets` is missing an entry for a node in `V`, or carries an entry for a node not in `V`.
    MissingOrExtraEntry(NodeId),
}

impl std::fmt::Display for InvalidInputReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateNode(id) => write!(f, "duplicate node id {id}"),
            Self::CoordinateOutOfRange { node, lon, lat } => {
                write!(f, "node {node} has out-of-range coordinate ({lon}, {lat})")
            }
            Self::NegativeBudget { node, budget } => {
                write!(f, "node {node} has negative budget {budget}")
            }
            Self::MissingOrExtraEntry(id) => {
                write!(f, "node {id} has a mismatched coords/budgets entry")
            }
        }
    }
}

/// Errors surfaced by [`crate::build_forest`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BoruvkaError {
    /// Surfaced before any round runs. See [`InvalidInputReason`].
    #[error("invalid input: {0}")]
    InvalidInput(InvalidInputReason),

    /// Only raised when anchor-consistency checking is requested: a pair of
    /// nodes declared as belonging to one anchor component resolved to
    /// different union-find roots.
    #[error("anchor nodes {a} and {b} do not resolve to the same component root")]
    InconsistentAnchor { a: NodeId, b: NodeId },
}
