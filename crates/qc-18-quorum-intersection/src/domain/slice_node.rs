//! Quorum-slice tree node
//!
//! One `QuorumSliceNode` mirrors one `QuorumSetConfig` level, with node ids
//! replaced by dense bit indices. Children are owned values; the cross-node
//! dependency graph only ever refers to nodes by index.
//!
//! INVARIANTS:
//! - Immutable after construction.
//! - `transitive_closure` = `direct_members` ∪ closures of all inner nodes.

use std::collections::{BTreeSet, HashMap};

use shared_types::{NodeId, QuorumSetConfig};

use super::bitset::BitSet;

/// Threshold requirement over direct members and nested requirements.
#[derive(Clone, Debug)]
pub struct QuorumSliceNode {
    threshold: usize,
    direct_members: BitSet,
    inner_nodes: Vec<QuorumSliceNode>,
    transitive_closure: BitSet,
    /// The closure bound in `contains_quorum_slice` is only exact when each
    /// satisfied member consumes a distinct candidate node: inner closures
    /// pairwise disjoint and disjoint from the direct members, and no inner
    /// node satisfiable by the empty set.
    closure_bound_exact: bool,
    satisfied_by_empty: bool,
}

impl QuorumSliceNode {
    pub fn new(threshold: usize, direct_members: BitSet, inner_nodes: Vec<QuorumSliceNode>) -> Self {
        let mut transitive_closure = direct_members.clone();
        let mut closure_bound_exact = true;
        let mut vacuous_children = 0;

        for inner in &inner_nodes {
            if inner.satisfied_by_empty {
                vacuous_children += 1;
                closure_bound_exact = false;
            }
            if transitive_closure.intersection_count(&inner.transitive_closure) > 0 {
                closure_bound_exact = false;
            }
            transitive_closure.union_with(&inner.transitive_closure);
        }
        transitive_closure.shrink_to_fit();

        Self {
            threshold,
            direct_members,
            inner_nodes,
            transitive_closure,
            closure_bound_exact,
            satisfied_by_empty: threshold <= vacuous_children,
        }
    }

    /// Convert a configuration, keeping only peers that have an index.
    ///
    /// Peers without an index are added to `dangling` and otherwise ignored.
    pub fn from_config(
        config: &QuorumSetConfig,
        index: &HashMap<NodeId, usize>,
        dangling: &mut BTreeSet<NodeId>,
    ) -> Self {
        let mut direct = BitSet::new();
        for validator in &config.validators {
            match index.get(validator) {
                Some(&bit) => direct.set(bit),
                None => {
                    dangling.insert(*validator);
                }
            }
        }
        direct.shrink_to_fit();

        let inner = config
            .inner_sets
            .iter()
            .map(|inner| Self::from_config(inner, index, dangling))
            .collect();

        Self::new(config.threshold as usize, direct, inner)
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn direct_members(&self) -> &BitSet {
        &self.direct_members
    }

    pub fn inner_nodes(&self) -> &[QuorumSliceNode] {
        &self.inner_nodes
    }

    /// Every node index this requirement mentions at any depth.
    pub fn transitive_closure(&self) -> &BitSet {
        &self.transitive_closure
    }

    /// Threshold 0 with nothing underneath.
    pub fn is_empty(&self) -> bool {
        self.threshold == 0 && self.transitive_closure.is_empty()
    }

    /// Whether `candidate` satisfies this requirement.
    ///
    /// Three exits, in order: enough direct hits; too few inner nodes or
    /// too few candidate nodes in the closure to ever reach the threshold;
    /// a scan of inner nodes that stops once the outcome is decided.
    pub fn contains_quorum_slice(&self, candidate: &BitSet) -> bool {
        let hit = candidate.intersection_count(&self.direct_members);
        if hit >= self.threshold {
            return true;
        }

        let mut needed = self.threshold - hit;
        if needed > self.inner_nodes.len() {
            return false;
        }

        if self.closure_bound_exact
            && candidate.intersection_count(&self.transitive_closure) < self.threshold
        {
            return false;
        }

        let mut tolerable_failures = self.inner_nodes.len() - needed;
        for inner in &self.inner_nodes {
            if inner.contains_quorum_slice(candidate) {
                needed -= 1;
                if needed == 0 {
                    return true;
                }
            } else {
                if tolerable_failures == 0 {
                    return false;
                }
                tolerable_failures -= 1;
            }
        }
        false
    }
}
