//! Quorum contraction and minimality
//!
//! A quorum is a non-empty set in which every member's own slice is
//! satisfied by the set. Because slice satisfaction is monotone, any set
//! contains a unique largest quorum, found by repeatedly dropping members
//! whose slice the current set does not satisfy.

use super::bitset::BitSet;
use super::graph::QuorumGraph;
use super::stats::CheckerStats;

impl QuorumGraph {
    /// Whether `candidate` satisfies node `i`'s own slice.
    pub fn contains_quorum_slice_for(&self, i: usize, candidate: &BitSet) -> bool {
        i < self.len() && self.node(i).contains_quorum_slice(candidate)
    }

    /// Whether `nodes` is itself a quorum (a non-empty fixed point).
    pub fn is_quorum(&self, nodes: &BitSet) -> bool {
        !nodes.is_empty() && nodes.iter().all(|i| self.contains_quorum_slice_for(i, nodes))
    }

    /// Largest quorum contained in `nodes`, or the empty set if none.
    ///
    /// The result is always a subset of `nodes`, and contracting it again
    /// returns it unchanged.
    pub fn contract_to_maximal_quorum(&self, nodes: &BitSet, stats: &mut CheckerStats) -> BitSet {
        let mut current = nodes.clone();
        loop {
            let filtered: BitSet = current
                .iter()
                .filter(|&i| self.contains_quorum_slice_for(i, &current))
                .collect();
            if filtered == current {
                break;
            }
            current = filtered;
        }

        if !current.is_empty() {
            stats.max_quorums_seen += 1;
            debug_assert!(self.is_quorum(&current), "contraction must reach a fixed point");
        }
        current
    }

    /// Whether `nodes` contains any quorum.
    pub fn contains_quorum(&self, nodes: &BitSet, stats: &mut CheckerStats) -> bool {
        !self.contract_to_maximal_quorum(nodes, stats).is_empty()
    }

    /// Whether the quorum `nodes` has no proper sub-quorum.
    ///
    /// Any proper sub-quorum misses at least one member, so it suffices to
    /// drop each member in turn and check that what is left contains no
    /// quorum at all.
    pub fn is_minimal_quorum(&self, nodes: &BitSet, stats: &mut CheckerStats) -> bool {
        debug_assert!(self.is_quorum(nodes), "minimality is only defined for quorums");

        let mut reduced = nodes.clone();
        for i in nodes.iter() {
            reduced.unset(i);
            if self.contains_quorum(&reduced, stats) {
                return false;
            }
            reduced.set(i);
        }
        stats.min_quorums_seen += 1;
        true
    }
}
