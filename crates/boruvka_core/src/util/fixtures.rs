//! Synthetic node sets shared between unit and integration tests, the
//! same role `ch_core::util::test_graphs` plays for OSM-backed graphs:
//! small, hand-picked, and named after the geometry they exercise.

use std::collections::HashMap;

use crate::constants::{NodeId, Weight};
use crate::types::Coordinate;

type Fixture = (Vec<NodeId>, HashMap<NodeId, Coordinate>, HashMap<NodeId, Weight>);

/// Two nodes ~1 113 m apart (spec.md scenario 1).
pub fn two_node_trivial(budget: Weight) -> Fixture {
    let v = vec![1, 2];
    let coords = HashMap::from([(1, Coordinate::new(0.0, 0.0)), (2, Coordinate::new(0.01, 0.0))]);
    let budgets = HashMap::from([(1, budget), (2, budget)]);
    (v, coords, budgets)
}

/// Equilateral-ish triangle, ~1 113 m per side (spec.md scenario 2).
pub fn triangle(budget: Weight) -> Fixture {
    let v = vec![1, 2, 3];
    let coords = HashMap::from([
        (1, Coordinate::new(0.0, 0.0)),
        (2, Coordinate::new(0.01, 0.0)),
        (3, Coordinate::new(0.005, 0.00866)),
    ]);
    let budgets = HashMap::from([(1, budget), (2, budget), (3, budget)]);
    (v, coords, budgets)
}

/// Convex quadrilateral whose diagonals cross (spec.md scenario 4). Node
/// ids 1..=4 run around the perimeter, so (1,3) and (2,4) are the
/// crossing diagonals and the four consecutive pairs are the sides.
pub fn crossing_quadrilateral(budget: Weight) -> Fixture {
    let v = vec![1, 2, 3, 4];
    let coords = HashMap::from([
        (1, Coordinate::new(0.0, 0.0)),
        (2, Coordinate::new(0.01, 0.0)),
        (3, Coordinate::new(0.01, 0.01)),
        (4, Coordinate::new(0.0, 0.01)),
    ]);
    let budgets = HashMap::from([(1, budget), (2, budget), (3, budget), (4, budget)]);
    (v, coords, budgets)
}

/// Three collinear nodes (spec.md scenario 6): (A,C) must lose to the
/// cycle check even though GeometryGuard alone would also reject it as a
/// shared-endpoint collinear overlap.
pub fn collinear_triple(budget: Weight) -> Fixture {
    let v = vec![1, 2, 3];
    let coords = HashMap::from([
        (1, Coordinate::new(0.0, 0.0)),
        (2, Coordinate::new(0.01, 0.0)),
        (3, Coordinate::new(0.02, 0.0)),
    ]);
    let budgets = HashMap::from([(1, budget), (2, budget), (3, budget)]);
    (v, coords, budgets)
}

/// Four demand nodes around one corner, each ~400 m from its neighbours
/// and ~300 m from where an anchor component would sit (spec.md
/// scenario 5). Callers build the anchor's `DisjointPartition` themselves
/// — this fixture only supplies the demand side.
pub fn anchor_adjacent_demands(budget: Weight) -> Fixture {
    let v = vec![1, 2, 3, 4];
    let coords = HashMap::from([
        (1, Coordinate::new(0.0, 0.0)),
        (2, Coordinate::new(0.0036, 0.0)),
        (3, Coordinate::new(0.0, 0.0036)),
        (4, Coordinate::new(0.0036, 0.0036)),
    ]);
    let budgets = HashMap::from([(1, budget), (2, budget), (3, budget), (4, budget)]);
    (v, coords, budgets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_have_matching_v_coords_and_budgets() {
        let (v, c, b) = triangle(1500.0);
        assert_eq!(v.len(), c.len());
        assert_eq!(v.len(), b.len());
        for id in &v {
            assert!(c.contains_key(id));
            assert!(b.contains_key(id));
        }
    }
}
