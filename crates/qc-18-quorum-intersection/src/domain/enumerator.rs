//! Minimal-quorum enumerator
//!
//! Backtracking search over subsets of the maximal SCC. Each frame fixes a
//! `committed` set that must be inside the candidate quorum and a
//! `remaining` set still undecided. The search answers whether any minimal
//! quorum has a disjoint quorum elsewhere in the maximal SCC.
//!
//! Exit rules, in evaluation order:
//! 1. `committed` is larger than `max_commit`
//! 2. `committed` contains a minimal quorum: answer for that quorum
//!    (3.1 disjoint quorum found, 3.2 none)
//! 3. the perimeter contains no quorum (2.1), or its maximal quorum drops
//!    part of `committed` (2.2)
//! 4. nothing remains to branch on
//! 5. otherwise branch on a split node, excluded first, then included

use tracing::{debug, info};

use super::bitset::BitSet;
use super::context::SearchContext;
use crate::error::QuorumIntersectionResult;

/// Calls between progress log lines.
const PROGRESS_INTERVAL: u64 = 1 << 20;

/// One frame of the enumeration.
#[derive(Clone, Debug)]
pub struct MinQuorumEnumerator {
    committed: BitSet,
    remaining: BitSet,
    perimeter: BitSet,
}

impl MinQuorumEnumerator {
    pub fn new(committed: BitSet, remaining: BitSet) -> Self {
        let perimeter = committed.union(&remaining);
        Self {
            committed,
            remaining,
            perimeter,
        }
    }

    pub fn committed(&self) -> &BitSet {
        &self.committed
    }

    pub fn remaining(&self) -> &BitSet {
        &self.remaining
    }

    pub fn perimeter(&self) -> &BitSet {
        &self.perimeter
    }

    /// Whether some minimal quorum extending `committed` within the
    /// perimeter has a disjoint quorum in the maximal SCC.
    ///
    /// Returns an error only when the run's budget runs out or it is
    /// interrupted; that outcome says nothing about intersection.
    pub fn any_min_quorum_has_disjoint_quorum(
        &self,
        ctx: &mut SearchContext<'_>,
    ) -> QuorumIntersectionResult<bool> {
        let graph = ctx.graph();
        let stats = ctx.stats();
        stats.calls_started += 1;
        if stats.calls_started % PROGRESS_INTERVAL == 0 {
            info!(
                calls = stats.calls_started,
                max_quorums_seen = stats.max_quorums_seen,
                min_quorums_seen = stats.min_quorums_seen,
                "Quorum intersection search in progress"
            );
        }
        ctx.check_budget()?;

        if self.committed.count() > ctx.max_commit() {
            ctx.stats().early_exit_1 += 1;
            return Ok(false);
        }

        let committed_quorum = graph.contract_to_maximal_quorum(&self.committed, ctx.stats());
        if !committed_quorum.is_empty() && graph.is_minimal_quorum(&committed_quorum, ctx.stats()) {
            return if ctx.has_disjoint_quorum(&committed_quorum) {
                ctx.stats().early_exit_31 += 1;
                debug!(quorum = %committed_quorum, "Minimal quorum has a disjoint quorum");
                Ok(true)
            } else {
                ctx.stats().early_exit_32 += 1;
                Ok(false)
            };
        }

        let perimeter_quorum = graph.contract_to_maximal_quorum(&self.perimeter, ctx.stats());
        if perimeter_quorum.is_empty() {
            ctx.stats().early_exit_21 += 1;
            return Ok(false);
        }
        if !self.committed.is_subset_of(&perimeter_quorum) {
            ctx.stats().early_exit_22 += 1;
            return Ok(false);
        }

        let Some(split) = self.pick_split_node(ctx) else {
            ctx.stats().terminations += 1;
            return Ok(false);
        };

        let mut remaining = self.remaining.clone();
        remaining.unset(split);

        ctx.stats().first_recursions_taken += 1;
        let excluded = MinQuorumEnumerator::new(self.committed.clone(), remaining.clone());
        if excluded.any_min_quorum_has_disjoint_quorum(ctx)? {
            return Ok(true);
        }

        ctx.stats().second_recursions_taken += 1;
        let mut committed = self.committed.clone();
        committed.set(split);
        MinQuorumEnumerator::new(committed, remaining).any_min_quorum_has_disjoint_quorum(ctx)
    }

    /// Remaining node with the highest in-degree among dependency edges
    /// confined to `remaining`; `None` when nothing remains.
    ///
    /// Branching on the most depended-upon node first is a performance
    /// heuristic only. Ties go through the context's tie-breaker.
    pub fn pick_split_node(&self, ctx: &mut SearchContext<'_>) -> Option<usize> {
        let graph = ctx.graph();
        let mut in_degree = vec![0usize; graph.len()];

        for i in self.remaining.iter() {
            for j in graph.successors(i).intersection(&self.remaining).iter() {
                in_degree[j] += 1;
            }
        }

        let max_degree = self.remaining.iter().map(|i| in_degree[i]).max()?;
        let candidates: Vec<usize> = self
            .remaining
            .iter()
            .filter(|&i| in_degree[i] == max_degree)
            .collect();
        ctx.pick(&candidates)
    }
}
