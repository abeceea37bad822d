//! Data types shared across the engine: coordinates and the accepted-edge
//! output. Mirrors `ch_core::graph::Node`'s role — a small
//! `Serialize`/`Deserialize` record read-only after construction — but
//! has no adjacency-list graph wrapped around it (the graph here is
//! implicit in the accepted-edge sequence plus the union-find).

use serde::{Deserialize, Serialize};

use crate::constants::{NodeId, Weight};

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Coordinate { lon, lat }
    }

    /// `true` iff within `-180 <= lon <= 180` and `-90 <= lat <= 90` (spec.md §6).
    pub fn in_range(&self) -> bool {
        (-180.0..=180.0).contains(&self.lon) && (-90.0..=90.0).contains(&self.lat)
    }
}

/// An edge the engine has committed to the output forest, in commit order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptedEdge {
    pub u: NodeId,
    pub v: NodeId,
    pub length: Weight,
}

impl AcceptedEdge {
    pub fn new(u: NodeId, v: NodeId, length: Weight) -> Self {
        AcceptedEdge { u, v, length }
    }
}
