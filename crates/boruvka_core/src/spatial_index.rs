//! Two spatial indices (spec.md §4.2): a k-NN index over node coordinates
//! for foreign-nearest-neighbour discovery, and a rectangle index over
//! accepted edges for the planarity guard's overlap queries.
//!
//! Neither index exists in `ch_core` — it routes fixed OSM edges and never
//! needs a geometric nearest-neighbour structure. The design is grounded
//! instead on the pack's other `rstar` users: `dt-spatial::network`
//! (`RoadNetwork`) builds exactly this kind of point R-tree over
//! `(lat, lon)` for node snapping, with the same
//! `RTreeObject`/`PointDistance` split used here, and
//! `butterfly-geometry`/`openmander-core::geometry` use an `RTree` of
//! bounding boxes for overlap queries the same way [`RectIndex`] does.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use crate::constants::NodeId;
use crate::geometry::cartesian;
use crate::types::Coordinate;

#[derive(Clone)]
struct IndexedPoint {
    xyz: [f64; 3],
    id: NodeId,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.xyz)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.xyz[0] - point[0];
        let dy = self.xyz[1] - point[1];
        let dz = self.xyz[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// k-NN index over the Cartesian projection of all node coordinates.
/// Built once at start (spec.md §4.2); immutable thereafter.
pub struct KnnIndex {
    tree: RTree<IndexedPoint>,
}

impl KnnIndex {
    pub fn build(coords: &FxHashMap<NodeId, Coordinate>, cartesian_radius_m: f64) -> Self {
        let points: Vec<IndexedPoint> = coords
            .iter()
            .map(|(&id, &coord)| {
                let p = cartesian(coord, cartesian_radius_m);
                IndexedPoint {
                    xyz: [p.x, p.y, p.z],
                    id,
                }
            })
            .collect();
        KnnIndex {
            tree: RTree::bulk_load(points),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The `k` nearest node ids to `query`, in ascending distance order.
    /// Returns fewer than `k` if the index holds fewer than `k` points.
    pub fn k_nearest(&self, query: Coordinate, cartesian_radius_m: f64, k: usize) -> Vec<NodeId> {
        let p = cartesian(query, cartesian_radius_m);
        self.tree
            .nearest_neighbor_iter(&[p.x, p.y, p.z])
            .take(k)
            .map(|ip| ip.id)
            .collect()
    }
}

/// Foreign-nearest-neighbour query (spec.md §4.2): starts with `start_k`,
/// asks for `start_k` nearest, inspects the `start_k`-th; if it lies in
/// `forbidden`, increments `k` and retries. Returns the first non-forbidden
/// result together with the `k` that found it (the caller memoises this as
/// the node's new remembered `k`). Returns `None` if `forbidden` covers
/// every node the index knows about.
///
/// `max_k`, if set, bounds the search — exceeding it indicates the caller
/// handed in a forbidden set covering all-but-one node across an
/// unreasonably large `V` (see [`crate::EngineConfig::max_k`]); that is an
/// internal-invariant condition, not a normal "no foreign neighbour yet".
pub fn foreign_nearest_neighbor(
    index: &KnnIndex,
    query: Coordinate,
    cartesian_radius_m: f64,
    forbidden: &rustc_hash::FxHashSet<NodeId>,
    start_k: usize,
    max_k: Option<usize>,
) -> Option<(NodeId, usize)> {
    let mut k = start_k.max(1);
    loop {
        if let Some(cap) = max_k {
            assert!(
                k <= cap,
                "foreign-nearest-neighbour search exceeded configured max_k={cap}"
            );
        }
        let ids = index.k_nearest(query, cartesian_radius_m, k);
        if ids.len() < k {
            return None;
        }
        let candidate = ids[k - 1];
        if !forbidden.contains(&candidate) {
            return Some((candidate, k));
        }
        k += 1;
    }
}

#[derive(Clone)]
struct IndexedRect {
    envelope: AABB<[f64; 2]>,
    payload: (NodeId, NodeId),
}

impl RTreeObject for IndexedRect {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Mutable rectangle index over accepted edges (spec.md §4.2). Supports
/// `insert` and `overlap`; result order from `overlap` is unspecified.
#[derive(Default)]
pub struct RectIndex {
    tree: RTree<IndexedRect>,
}

impl RectIndex {
    pub fn new() -> Self {
        RectIndex { tree: RTree::new() }
    }

    pub fn insert(&mut self, bbox: (f64, f64, f64, f64), payload: (NodeId, NodeId)) {
        let envelope = AABB::from_corners([bbox.0, bbox.1], [bbox.2, bbox.3]);
        self.tree.insert(IndexedRect { envelope, payload });
    }

    pub fn overlap(&self, bbox: (f64, f64, f64, f64)) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        let envelope = AABB::from_corners([bbox.0, bbox.1], [bbox.2, bbox.3]);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|r| r.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    const R: f64 = 6_378_137.0;

    fn coords(pairs: &[(NodeId, f64, f64)]) -> FxHashMap<NodeId, Coordinate> {
        pairs
            .iter()
            .map(|&(id, lon, lat)| (id, Coordinate::new(lon, lat)))
            .collect()
    }

    #[test]
    fn k_nearest_is_ascending_by_distance() {
        let c = coords(&[(1, 0.0, 0.0), (2, 0.1, 0.0), (3, 1.0, 0.0), (4, 10.0, 0.0)]);
        let idx = KnnIndex::build(&c, R);
        let nearest = idx.k_nearest(Coordinate::new(0.0, 0.0), R, 3);
        assert_eq!(nearest[0], 1);
        assert_eq!(nearest.len(), 3);
        assert!(nearest.contains(&2));
        assert!(nearest.contains(&3));
    }

    #[test]
    fn foreign_nearest_neighbor_skips_forbidden_and_grows_k() {
        let c = coords(&[(1, 0.0, 0.0), (2, 0.01, 0.0), (3, 0.02, 0.0), (4, 1.0, 0.0)]);
        let idx = KnnIndex::build(&c, R);
        let mut forbidden = FxHashSet::default();
        forbidden.insert(1u64);
        forbidden.insert(2u64);

        let (found, k) =
            foreign_nearest_neighbor(&idx, Coordinate::new(0.0, 0.0), R, &forbidden, 2, None)
                .expect("a foreign neighbor exists");
        assert_eq!(found, 3);
        assert_eq!(k, 3);
    }

    #[test]
    fn foreign_nearest_neighbor_none_when_all_forbidden() {
        let c = coords(&[(1, 0.0, 0.0), (2, 0.01, 0.0)]);
        let idx = KnnIndex::build(&c, R);
        let mut forbidden = FxHashSet::default();
        forbidden.insert(1u64);
        forbidden.insert(2u64);

        assert!(foreign_nearest_neighbor(&idx, Coordinate::new(0.0, 0.0), R, &forbidden, 2, None)
            .is_none());
    }

    #[test]
    fn rect_index_overlap_finds_intersecting_bbox() {
        let mut idx = RectIndex::new();
        idx.insert((0.0, 0.0, 1.0, 1.0), (1, 2));
        idx.insert((10.0, 10.0, 11.0, 11.0), (3, 4));

        let hits: Vec<_> = idx.overlap((0.5, 0.5, 2.0, 2.0)).collect();
        assert_eq!(hits, vec![(1, 2)]);

        let none: Vec<_> = idx.overlap((50.0, 50.0, 51.0, 51.0)).collect();
        assert!(none.is_empty());
    }
}
