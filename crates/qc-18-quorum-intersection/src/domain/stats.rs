//! Per-run search statistics
//!
//! Counters accumulate monotonically for one checker run and are surfaced
//! for diagnostics only. Nothing in the verdict path reads them.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Counter block for one quorum-intersection run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerStats {
    /// Nodes with a known configuration
    pub total_nodes: usize,
    /// Strongly connected components in the dependency graph
    pub scc_count: usize,
    /// Size of the maximal component
    pub max_scc_size: usize,
    /// Largest committed set the enumerator will still extend
    pub max_commit: usize,
    /// Enumerator invocations
    pub calls_started: u64,
    /// Recursions into the "split node excluded" branch
    pub first_recursions_taken: u64,
    /// Recursions into the "split node included" branch
    pub second_recursions_taken: u64,
    /// Non-empty maximal-quorum contractions
    pub max_quorums_seen: u64,
    /// Sets confirmed to be minimal quorums
    pub min_quorums_seen: u64,
    /// Committed set exceeded `max_commit`
    pub early_exit_1: u64,
    /// Perimeter contained no quorum
    pub early_exit_21: u64,
    /// Perimeter quorum dropped part of the committed set
    pub early_exit_22: u64,
    /// Minimal quorum with a disjoint quorum found
    pub early_exit_31: u64,
    /// Minimal quorum without a disjoint quorum
    pub early_exit_32: u64,
    /// Nothing left to branch on
    pub terminations: u64,
    /// Wall-clock time of the run in milliseconds
    pub elapsed_ms: u64,
}

impl CheckerStats {
    /// Sum of every early-exit and terminal counter.
    pub fn exits_total(&self) -> u64 {
        self.early_exit_1
            + self.early_exit_21
            + self.early_exit_22
            + self.early_exit_31
            + self.early_exit_32
            + self.terminations
    }

    /// Emit the counter block as one structured log line.
    pub fn log_summary(&self) {
        info!(
            total_nodes = self.total_nodes,
            scc_count = self.scc_count,
            max_scc_size = self.max_scc_size,
            max_commit = self.max_commit,
            calls_started = self.calls_started,
            first_recursions = self.first_recursions_taken,
            second_recursions = self.second_recursions_taken,
            max_quorums_seen = self.max_quorums_seen,
            min_quorums_seen = self.min_quorums_seen,
            exit_1 = self.early_exit_1,
            exit_2_1 = self.early_exit_21,
            exit_2_2 = self.early_exit_22,
            exit_3_1 = self.early_exit_31,
            exit_3_2 = self.early_exit_32,
            terminations = self.terminations,
            elapsed_ms = self.elapsed_ms,
            "Quorum intersection search statistics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exits_total() {
        let stats = CheckerStats {
            early_exit_1: 1,
            early_exit_21: 2,
            early_exit_22: 3,
            early_exit_31: 4,
            early_exit_32: 5,
            terminations: 6,
            ..Default::default()
        };
        assert_eq!(stats.exits_total(), 21);
    }

    #[test]
    fn test_log_summary_does_not_panic_without_subscriber() {
        CheckerStats::default().log_summary();
    }
}
