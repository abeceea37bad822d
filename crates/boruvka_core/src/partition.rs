//! Union-find with path compression, weighted union, and per-root
//! satellite state (budget ledger, member list, candidate-edge queue).
//!
//! Design Notes §9 calls out that the Python original aliases its child
//! and queue containers across roots after `union`, so two different keys
//! can observe the same mutable state through different names. This
//! implementation takes the clean re-architecture the Design Notes
//! recommend: satellite data lives in a map keyed by *current* root only;
//! `union` combines the two entries and deletes the absorbed key outright,
//! so there is nothing left to alias. Callers always reach satellite state
//! through [`DisjointPartition::find`] first.

use rustc_hash::FxHashMap;

use crate::constants::{NodeId, Weight};
use crate::queue::EdgeQueue;

/// Per-root state: aggregate budget (invariant B2), member list, and the
/// root's mergeable candidate-edge queue (spec.md §4.3.1).
#[derive(Debug)]
struct Satellite {
    budget: Weight,
    members: Vec<NodeId>,
    queue: EdgeQueue,
}

/// Union-find over [`NodeId`]s with lazy singleton registration.
pub struct DisjointPartition {
    parent: FxHashMap<NodeId, NodeId>,
    weight: FxHashMap<NodeId, usize>,
    satellite: FxHashMap<NodeId, Satellite>,
    /// Budget assigned to a node the first time it is seen by `find`.
    node_budgets: FxHashMap<NodeId, Weight>,
}

impl DisjointPartition {
    /// `node_budgets` supplies the starting budget for every node the
    /// partition will ever see; nodes not yet unioned are lazily
    /// registered as singletons the first time [`find`](Self::find) sees
    /// them, per spec.md §4.3.
    pub fn new(node_budgets: FxHashMap<NodeId, Weight>) -> Self {
        DisjointPartition {
            parent: FxHashMap::default(),
            weight: FxHashMap::default(),
            satellite: FxHashMap::default(),
            node_budgets,
        }
    }

    fn ensure_registered(&mut self, x: NodeId) {
        if self.parent.contains_key(&x) {
            return;
        }
        let budget = *self.node_budgets.get(&x).unwrap_or(&0.0);
        self.parent.insert(x, x);
        self.weight.insert(x, 1);
        self.satellite.insert(
            x,
            Satellite {
                budget,
                members: vec![x],
                queue: EdgeQueue::new(),
            },
        );
    }

    /// Path-compressed find. Lazily registers `x` as a singleton if unseen.
    pub fn find(&mut self, x: NodeId) -> NodeId {
        self.ensure_registered(x);

        let mut path = vec![x];
        let mut root = self.parent[&x];
        while root != *path.last().unwrap() {
            path.push(root);
            root = self.parent[&root];
        }
        for node in path {
            self.parent.insert(node, root);
        }
        root
    }

    /// Aggregate budget of `find(x)`'s component (invariant B2).
    pub fn budget(&mut self, x: NodeId) -> Weight {
        let root = self.find(x);
        self.satellite[&root].budget
    }

    /// Directly overrides the budget of `find(x)`'s component. Exists so a
    /// `GridAnchor` collaborator can set a pre-unioned anchor component's
    /// budget to `+inf` (spec.md §6) without routing through the normal
    /// `node_budgets` seed.
    pub fn set_budget(&mut self, x: NodeId, budget: Weight) {
        let root = self.find(x);
        self.satellite.get_mut(&root).unwrap().budget = budget;
    }

    /// Member list of `find(x)`'s component. Order is unspecified.
    pub fn members(&mut self, x: NodeId) -> &[NodeId] {
        let root = self.find(x);
        &self.satellite[&root].members
    }

    /// Mutable access to `find(x)`'s component candidate-edge queue.
    pub fn queue_mut(&mut self, x: NodeId) -> &mut EdgeQueue {
        let root = self.find(x);
        &mut self.satellite.get_mut(&root).unwrap().queue
    }

    /// All current component roots.
    pub fn components(&mut self) -> Vec<NodeId> {
        let keys: Vec<NodeId> = self.parent.keys().copied().collect();
        let mut roots: Vec<NodeId> = keys.into_iter().map(|k| self.find(k)).collect();
        roots.sort_unstable();
        roots.dedup();
        roots
    }

    /// Merges the components of `a` and `b` across an edge of length `d`.
    /// Heavier (by subtree weight) survives; budget of the survivor becomes
    /// `budget(a) + budget(b) - d` (invariant B2). Returns the survivor's
    /// root. Caller must have already checked `find(a) != find(b)` — union
    /// of an element with itself is a caller bug, not a recoverable error.
    pub fn union(&mut self, a: NodeId, b: NodeId, d: Weight) -> NodeId {
        let ra = self.find(a);
        let rb = self.find(b);
        assert!(
            ra != rb,
            "union() called on already-connected nodes {a} and {b}: would create a cycle"
        );

        let wa = self.weight[&ra];
        let wb = self.weight[&rb];
        let (survivor, absorbed) = if wa >= wb { (ra, rb) } else { (rb, ra) };

        let absorbed_weight = if survivor == ra { wb } else { wa };
        self.parent.insert(absorbed, survivor);
        *self.weight.get_mut(&survivor).unwrap() += absorbed_weight;
        self.weight.remove(&absorbed);

        let mut absorbed_sat = self.satellite.remove(&absorbed).unwrap();
        let survivor_sat = self.satellite.get_mut(&survivor).unwrap();
        survivor_sat.budget = survivor_sat.budget + absorbed_sat.budget - d;
        survivor_sat.members.append(&mut absorbed_sat.members);
        survivor_sat.queue.merge(&mut absorbed_sat.queue);

        survivor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn budgets(pairs: &[(NodeId, Weight)]) -> FxHashMap<NodeId, Weight> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn find_lazily_registers_singletons() {
        let mut dp = DisjointPartition::new(budgets(&[(1, 10.0)]));
        assert_eq!(dp.find(1), 1);
        assert_eq!(dp.budget(1), 10.0);
        assert_eq!(dp.members(1), &[1]);
    }

    #[test]
    fn unseen_node_defaults_to_zero_budget() {
        let mut dp = DisjointPartition::new(budgets(&[]));
        assert_eq!(dp.budget(42), 0.0);
    }

    #[test]
    fn union_combines_budget_per_b2() {
        let mut dp = DisjointPartition::new(budgets(&[(1, 100.0), (2, 50.0)]));
        dp.find(1);
        dp.find(2);
        let root = dp.union(1, 2, 30.0);
        assert_abs_diff_eq!(dp.budget(root), 120.0, epsilon = 1e-9);
        assert_eq!(dp.find(1), dp.find(2));
    }

    #[test]
    fn union_preserves_member_lists() {
        let mut dp = DisjointPartition::new(budgets(&[(1, 1.0), (2, 1.0), (3, 1.0)]));
        dp.union(1, 2, 0.0);
        dp.union(2, 3, 0.0);
        let mut members = dp.members(1).to_vec();
        members.sort_unstable();
        assert_eq!(members, vec![1, 2, 3]);
    }

    #[test]
    fn infinite_budget_survives_union() {
        let mut dp = DisjointPartition::new(budgets(&[(1, f64::INFINITY), (2, 5.0)]));
        let root = dp.union(1, 2, 3.0);
        assert!(dp.budget(root).is_infinite());
    }

    #[test]
    #[should_panic(expected = "would create a cycle")]
    fn union_on_same_component_panics() {
        let mut dp = DisjointPartition::new(budgets(&[(1, 1.0), (2, 1.0)]));
        dp.union(1, 2, 0.0);
        dp.union(1, 2, 0.0);
    }

    #[test]
    fn components_lists_distinct_roots() {
        let mut dp = DisjointPartition::new(budgets(&[(1, 1.0), (2, 1.0), (3, 1.0)]));
        dp.union(1, 2, 0.0);
        dp.find(3);
        let comps = dp.components();
        assert_eq!(comps.len(), 2);
    }
}
