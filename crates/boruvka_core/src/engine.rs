//! Orchestrates the modified Borůvka algorithm (spec.md §4.5): the engine
//! owns the k-NN index, the rectangle index, and the [`DisjointPartition`],
//! and drives gather/commit rounds until no round changes the accepted-edge
//! set or a spanning tree is complete.
//!
//! `ch_core` has nothing directly analogous — its `search` module walks a
//! fixed contraction hierarchy rather than growing one — so the round loop
//! below is grounded on spec.md §4.5 itself, with logging placement and
//! the `Result`/panic split following `ch_core::graph`'s conventions
//! (`log::{info,debug,warn}` at the granularity `graph.rs` uses, `assert!`
//! for conditions a correctly constructed caller can never trigger).

use rustc_hash::{FxHashMap, FxHashSet};

use crate::constants::{NodeId, Weight};
use crate::error::{BoruvkaError, InvalidInputReason};
use crate::geometry::{bbox, cartesian, haversine, project_2d, sq_dist_3d};
use crate::geometry_guard::crosses_accepted;
use crate::partition::DisjointPartition;
use crate::queue::{EdgeCandidate, EdgeQueue};
use crate::spatial_index::{foreign_nearest_neighbor, KnnIndex, RectIndex};
use crate::types::{AcceptedEdge, Coordinate};

/// Tunable constants for a single `build_forest` run (spec.md §8,
/// mirroring `ch_core::contraction_params::ContractionParams`'s role of
/// keeping magic numbers out of the algorithm body).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Initial remembered `k` for a node with no FNN history yet (spec.md §4.2 default: 2).
    pub initial_k: usize,
    /// Earth radius in metres for the Cartesian/ECEF projection (spec.md §4.1: 6 378 137).
    pub cartesian_radius_m: f64,
    /// Earth radius in metres for haversine commit-time length (spec.md §4.1: 6 371 010).
    pub haversine_radius_m: f64,
    /// Optional cap on k-NN growth per FNN query. `None` means unbounded,
    /// matching the Python original. Exceeding the cap panics rather than
    /// looping forever (see [`crate::spatial_index::foreign_nearest_neighbor`]).
    pub max_k: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            initial_k: 2,
            cartesian_radius_m: 6_378_137.0,
            haversine_radius_m: 6_371_010.0,
            max_k: None,
        }
    }
}

/// Validates `V`/`coords`/`budgets` against spec.md §7's `InvalidInput`
/// conditions, before any round runs.
fn validate_input(
    v: &[NodeId],
    coords: &std::collections::HashMap<NodeId, Coordinate>,
    budgets: &std::collections::HashMap<NodeId, Weight>,
) -> Result<(), BoruvkaError> {
    let mut seen = FxHashSet::default();
    for &id in v {
        if !seen.insert(id) {
            return Err(BoruvkaError::InvalidInput(InvalidInputReason::DuplicateNode(id)));
        }
    }

    for &id in v {
        let coord = coords
            .get(&id)
            .ok_or(BoruvkaError::InvalidInput(InvalidInputReason::MissingOrExtraEntry(id)))?;
        if !coord.in_range() {
            return Err(BoruvkaError::InvalidInput(InvalidInputReason::CoordinateOutOfRange {
                node: id,
                lon: coord.lon,
                lat: coord.lat,
            }));
        }
        let budget = budgets
            .get(&id)
            .ok_or(BoruvkaError::InvalidInput(InvalidInputReason::MissingOrExtraEntry(id)))?;
        if budget.is_nan() || *budget < 0.0 {
            return Err(BoruvkaError::InvalidInput(InvalidInputReason::NegativeBudget {
                node: id,
                budget: *budget,
            }));
        }
    }

    if coords.len() != seen.len() {
        let extra = coords.keys().find(|k| !seen.contains(k)).copied().unwrap();
        return Err(BoruvkaError::InvalidInput(InvalidInputReason::MissingOrExtraEntry(extra)));
    }
    if budgets.len() != seen.len() {
        let extra = budgets.keys().find(|k| !seen.contains(k)).copied().unwrap();
        return Err(BoruvkaError::InvalidInput(InvalidInputReason::MissingOrExtraEntry(extra)));
    }

    Ok(())
}

/// Optional mode (spec.md §7): asserts that every pair of nodes declared
/// as belonging to one anchor component resolves to the same union-find
/// root. Not called by `build_forest` itself — a caller that pre-unions
/// anchor components via `initial_partition` runs this first if it wants
/// the check.
pub fn check_anchor_consistency(
    partition: &mut DisjointPartition,
    groups: &[Vec<NodeId>],
) -> Result<(), BoruvkaError> {
    for group in groups {
        let mut iter = group.iter().copied();
        let Some(first) = iter.next() else { continue };
        let root = partition.find(first);
        for other in iter {
            if partition.find(other) != root {
                return Err(BoruvkaError::InconsistentAnchor { a: first, b: other });
            }
        }
    }
    Ok(())
}

/// Orchestrates the modified Borůvka rounds (spec.md §4.5). Built and run
/// once per [`build_forest`] call.
pub struct BoruvkaEngine {
    config: EngineConfig,
    knn: KnnIndex,
    rect_index: RectIndex,
    coords: FxHashMap<NodeId, Coordinate>,
    remembered_k: FxHashMap<NodeId, usize>,
    partition: DisjointPartition,
    accepted: Vec<AcceptedEdge>,
    target_edges: usize,
}

impl BoruvkaEngine {
    fn new(
        nodes: &[NodeId],
        coords: FxHashMap<NodeId, Coordinate>,
        partition: DisjointPartition,
        rect_index: RectIndex,
        config: EngineConfig,
    ) -> Self {
        let knn = KnnIndex::build(&coords, config.cartesian_radius_m);
        BoruvkaEngine {
            config,
            knn,
            rect_index,
            coords,
            remembered_k: FxHashMap::default(),
            partition,
            accepted: Vec::new(),
            target_edges: nodes.len().saturating_sub(1),
        }
    }

    fn coord_of(&self, id: NodeId) -> Coordinate {
        *self.coords.get(&id).expect("node id not present in engine's coordinate map")
    }

    fn project(&self, id: NodeId) -> [f64; 2] {
        project_2d(self.coord_of(id), self.config.cartesian_radius_m)
    }

    /// Initialisation (spec.md §4.5): every node pushes its first foreign
    /// candidate — forbidden set is just itself — onto its own queue.
    fn initialize(&mut self, nodes: &[NodeId]) {
        for &v in nodes {
            let coord = self.coord_of(v);
            let mut forbidden = FxHashSet::default();
            forbidden.insert(v);
            let k = self.config.initial_k;
            match foreign_nearest_neighbor(&self.knn, coord, self.config.cartesian_radius_m, &forbidden, k, self.config.max_k) {
                Some((vm, found_k)) => {
                    self.remembered_k.insert(v, found_k);
                    let priority = sq_dist_3d(
                        cartesian(coord, self.config.cartesian_radius_m),
                        cartesian(self.coord_of(vm), self.config.cartesian_radius_m),
                    );
                    self.partition.queue_mut(v).push(EdgeCandidate::new(v, vm, priority));
                }
                None => {
                    // Only possible with |V| <= 1, which build_forest short-circuits before
                    // constructing an engine at all.
                    self.remembered_k.insert(v, k);
                }
            }
        }
    }

    /// Phase P1 (spec.md §4.5): one candidate per live component, re-querying
    /// FNN in place until the component's queue top is a genuinely foreign node.
    fn gather(&mut self) -> EdgeQueue {
        let mut ep = EdgeQueue::new();
        for c in self.partition.components() {
            loop {
                let Some(top) = self.partition.queue_mut(c).top() else {
                    log::debug!("component {c} has an empty candidate queue, skipping this round");
                    break;
                };
                let members = self.partition.members(c).to_vec();
                if members.contains(&top.to) {
                    self.partition.queue_mut(c).pop();
                    let forbidden: FxHashSet<NodeId> = members.iter().copied().collect();
                    let v = top.from;
                    let coord = self.coord_of(v);
                    let k = *self.remembered_k.get(&v).unwrap_or(&self.config.initial_k);
                    log::debug!("component {c}: candidate {v}->{} is now internal, re-querying FNN from k={k}", top.to);
                    match foreign_nearest_neighbor(&self.knn, coord, self.config.cartesian_radius_m, &forbidden, k, self.config.max_k) {
                        Some((um, found_k)) => {
                            self.remembered_k.insert(v, found_k);
                            let priority = sq_dist_3d(
                                cartesian(coord, self.config.cartesian_radius_m),
                                cartesian(self.coord_of(um), self.config.cartesian_radius_m),
                            );
                            self.partition.queue_mut(c).push(EdgeCandidate::new(v, um, priority));
                        }
                        None => {
                            log::warn!("component {c} has no foreign neighbour left for node {v}");
                        }
                    }
                    continue;
                }

                let d = haversine(self.coord_of(top.from), self.coord_of(top.to), self.config.haversine_radius_m);
                ep.push(EdgeCandidate::new(top.from, top.to, d));
                break;
            }
        }
        ep
    }

    /// Phase P2 (spec.md §4.5, with Design Notes §9's recommended fix (a)
    /// applied): the planarity check runs *before* `union`, so a rejected
    /// candidate never merges its components without a recorded edge.
    fn commit(&mut self, ep: &mut EdgeQueue) -> usize {
        let before = self.accepted.len();
        while let Some(cand) = ep.pop() {
            let (u, v, d) = (cand.from, cand.to, cand.priority);
            let ru = self.partition.find(u);
            let rv = self.partition.find(v);
            if ru == rv {
                log::debug!("candidate {u}-{v} would close a cycle, skipping");
                continue;
            }

            let bu = self.partition.budget(u);
            let bv = self.partition.budget(v);
            if bu >= d && bv >= d {
                let p1 = self.project(u);
                let p2 = self.project(v);
                let crosses = crosses_accepted(u, v, p1, p2, &self.rect_index, |id| self.project(id));
                if crosses {
                    log::debug!("candidate {u}-{v} (length {d:.1}m) rejected: crosses an accepted edge");
                    continue;
                }
                self.partition.union(u, v, d);
                self.rect_index.insert(bbox(p1, p2), (u, v));
                self.accepted.push(AcceptedEdge::new(u, v, d));
                log::info!("accepted edge {u}-{v}, length {d:.1}m");
            } else {
                log::debug!("candidate {u}-{v} (length {d:.1}m) rejected: insolvent (budgets {bu:.1}/{bv:.1})");
                self.partition.queue_mut(u).pop();
            }
        }
        self.accepted.len() - before
    }

    /// Runs rounds until termination (spec.md §4.5).
    fn run(&mut self, nodes: &[NodeId]) {
        self.initialize(nodes);
        let mut round = 0usize;
        loop {
            if self.accepted.len() >= self.target_edges {
                log::info!("spanning tree complete after {round} rounds ({} edges)", self.accepted.len());
                break;
            }
            round += 1;
            let mut ep = self.gather();
            let accepted_this_round = self.commit(&mut ep);
            log::info!("round {round}: {accepted_this_round} edges accepted ({} total)", self.accepted.len());
            if accepted_this_round == 0 {
                log::info!("round {round} committed nothing, halting");
                break;
            }
        }
    }
}

/// The sole public entry point (spec.md §6).
///
/// `initial_partition`, if given, must already reflect any pre-unioned
/// anchor components with their budgets set to `+inf` (a `GridAnchor`
/// collaborator's job, not this function's). `initial_edges` seeds the
/// rectangle index so the engine never crosses geometry it did not itself
/// accept, without those edges appearing in the returned sequence.
pub fn build_forest(
    v: Vec<NodeId>,
    coords: std::collections::HashMap<NodeId, Coordinate>,
    budgets: std::collections::HashMap<NodeId, Weight>,
    initial_partition: Option<DisjointPartition>,
    initial_edges: Option<Vec<(NodeId, NodeId)>>,
    config: &EngineConfig,
) -> Result<Vec<AcceptedEdge>, BoruvkaError> {
    validate_input(&v, &coords, &budgets)?;

    if v.len() <= 1 {
        return Ok(Vec::new());
    }

    let coords_fx: FxHashMap<NodeId, Coordinate> = v.iter().map(|&id| (id, coords[&id])).collect();
    let budgets_fx: FxHashMap<NodeId, Weight> = v.iter().map(|&id| (id, budgets[&id])).collect();

    let mut rect_index = RectIndex::new();
    if let Some(edges) = initial_edges {
        for (a, b) in edges {
            let pa = project_2d(coords_fx[&a], config.cartesian_radius_m);
            let pb = project_2d(coords_fx[&b], config.cartesian_radius_m);
            rect_index.insert(bbox(pa, pb), (a, b));
        }
    }

    let partition = initial_partition.unwrap_or_else(|| DisjointPartition::new(budgets_fx));

    let mut engine = BoruvkaEngine::new(&v, coords_fx, partition, rect_index, *config);
    engine.run(&v);

    Ok(engine.accepted)
}
