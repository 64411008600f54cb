//! Search context threaded through the enumerator
//!
//! Holds the read-only graph and maximal SCC, plus everything a run
//! mutates: statistics, the tie-break RNG and the latest split witness.
//! Passing it explicitly keeps each enumerator frame free of hidden state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::bitset::BitSet;
use super::config::{CheckerConfig, TieBreak};
use super::graph::QuorumGraph;
use super::stats::CheckerStats;
use crate::error::{QuorumIntersectionError, QuorumIntersectionResult};

/// Call, time and interrupt limits for one run.
#[derive(Debug)]
pub struct SearchBudget {
    max_calls: Option<u64>,
    time_limit: Option<Duration>,
    started: Instant,
    interrupt: Option<Arc<AtomicBool>>,
}

impl SearchBudget {
    /// No limits at all.
    pub fn unlimited() -> Self {
        Self {
            max_calls: None,
            time_limit: None,
            started: Instant::now(),
            interrupt: None,
        }
    }

    /// Limits from `config`, starting the clock now.
    pub fn from_config(config: &CheckerConfig, interrupt: Arc<AtomicBool>) -> Self {
        Self {
            max_calls: config.max_calls,
            time_limit: config.time_limit,
            started: Instant::now(),
            interrupt: Some(interrupt),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Fail if the run must stop after `calls` enumerator calls.
    pub fn check(&self, calls: u64) -> QuorumIntersectionResult<()> {
        if self
            .interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            return Err(QuorumIntersectionError::Interrupted);
        }

        if let Some(limit) = self.max_calls {
            if calls > limit {
                return Err(QuorumIntersectionError::CallBudgetExhausted { calls, limit });
            }
        }

        if let Some(limit) = self.time_limit {
            let elapsed = self.elapsed();
            if elapsed > limit {
                return Err(QuorumIntersectionError::TimeBudgetExhausted {
                    elapsed_ms: elapsed.as_millis() as u64,
                    limit_ms: limit.as_millis() as u64,
                });
            }
        }

        Ok(())
    }
}

/// Split-node tie-break state.
#[derive(Debug)]
pub enum TieBreaker {
    LowestIndex,
    Random(StdRng),
}

impl TieBreaker {
    pub fn from_config(config: &CheckerConfig) -> Self {
        match config.tie_break {
            TieBreak::LowestIndex => Self::LowestIndex,
            TieBreak::Random => Self::Random(match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            }),
        }
    }

    /// Choose one of `candidates`, which are in ascending index order.
    pub fn pick(&mut self, candidates: &[usize]) -> Option<usize> {
        match self {
            Self::LowestIndex => candidates.first().copied(),
            Self::Random(rng) => candidates.choose(rng).copied(),
        }
    }
}

/// A minimal quorum and a quorum disjoint from it, as node indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitWitness {
    pub quorum: BitSet,
    pub disjoint: BitSet,
}

/// Shared state for one enumeration run.
pub struct SearchContext<'a> {
    graph: &'a QuorumGraph,
    max_scc: &'a BitSet,
    max_commit: usize,
    stats: &'a mut CheckerStats,
    budget: SearchBudget,
    tie_breaker: TieBreaker,
    split: Option<SplitWitness>,
}

impl<'a> SearchContext<'a> {
    /// Committed sets larger than half the maximal SCC plus one are never
    /// extended: of two disjoint quorums inside the SCC, one has at most
    /// half its nodes.
    pub fn new(
        graph: &'a QuorumGraph,
        max_scc: &'a BitSet,
        stats: &'a mut CheckerStats,
        budget: SearchBudget,
        tie_breaker: TieBreaker,
    ) -> Self {
        let max_commit = max_scc.count() / 2 + 1;
        stats.max_commit = max_commit;
        Self {
            graph,
            max_scc,
            max_commit,
            stats,
            budget,
            tie_breaker,
            split: None,
        }
    }

    pub fn graph(&self) -> &'a QuorumGraph {
        self.graph
    }

    pub fn max_scc(&self) -> &'a BitSet {
        self.max_scc
    }

    pub fn max_commit(&self) -> usize {
        self.max_commit
    }

    pub fn stats(&mut self) -> &mut CheckerStats {
        &mut *self.stats
    }

    pub fn budget(&self) -> &SearchBudget {
        &self.budget
    }

    /// Fail if the run has used up its budget.
    pub fn check_budget(&self) -> QuorumIntersectionResult<()> {
        self.budget.check(self.stats.calls_started)
    }

    pub fn pick(&mut self, candidates: &[usize]) -> Option<usize> {
        self.tie_breaker.pick(candidates)
    }

    /// Whether the rest of the maximal SCC contains a quorum disjoint from
    /// `quorum`. Records the pair as the current witness when it does.
    pub fn has_disjoint_quorum(&mut self, quorum: &BitSet) -> bool {
        let complement = self.max_scc.difference(quorum);
        let disjoint = self.graph.contract_to_maximal_quorum(&complement, &mut *self.stats);
        if disjoint.is_empty() {
            return false;
        }
        self.split = Some(SplitWitness {
            quorum: quorum.clone(),
            disjoint,
        });
        true
    }

    pub fn split(&self) -> Option<&SplitWitness> {
        self.split.as_ref()
    }

    pub fn take_split(&mut self) -> Option<SplitWitness> {
        self.split.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_budget_never_fails() {
        assert!(SearchBudget::unlimited().check(u64::MAX).is_ok());
    }

    #[test]
    fn test_call_budget() {
        let config = CheckerConfig::default().with_max_calls(10);
        let budget = SearchBudget::from_config(&config, Arc::new(AtomicBool::new(false)));

        assert!(budget.check(10).is_ok());
        assert_eq!(
            budget.check(11),
            Err(QuorumIntersectionError::CallBudgetExhausted { calls: 11, limit: 10 })
        );
    }

    #[test]
    fn test_interrupt_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let budget = SearchBudget::from_config(&CheckerConfig::default(), flag.clone());

        assert!(budget.check(1).is_ok());
        flag.store(true, Ordering::Relaxed);
        assert_eq!(budget.check(1), Err(QuorumIntersectionError::Interrupted));
    }

    #[test]
    fn test_time_budget() {
        let config = CheckerConfig::default().with_time_limit(Duration::from_millis(1));
        let budget = SearchBudget::from_config(&config, Arc::new(AtomicBool::new(false)));

        std::thread::sleep(Duration::from_millis(5));
        assert!(matches!(
            budget.check(1),
            Err(QuorumIntersectionError::TimeBudgetExhausted { limit_ms: 1, .. })
        ));
    }

    #[test]
    fn test_lowest_index_tie_break() {
        let mut breaker = TieBreaker::from_config(&CheckerConfig::default().deterministic());
        assert_eq!(breaker.pick(&[4, 7, 9]), Some(4));
        assert_eq!(breaker.pick(&[]), None);
    }

    #[test]
    fn test_random_tie_break_stays_in_candidates() {
        let config = CheckerConfig {
            seed: Some(7),
            ..Default::default()
        };
        let mut breaker = TieBreaker::from_config(&config);
        for _ in 0..100 {
            let picked = breaker.pick(&[2, 5, 11]).unwrap();
            assert!([2, 5, 11].contains(&picked));
        }
    }

    #[test]
    fn test_seeded_random_tie_break_is_reproducible() {
        let config = CheckerConfig {
            seed: Some(99),
            ..Default::default()
        };
        let mut a = TieBreaker::from_config(&config);
        let mut b = TieBreaker::from_config(&config);
        let candidates: Vec<usize> = (0..50).collect();
        for _ in 0..20 {
            assert_eq!(a.pick(&candidates), b.pick(&candidates));
        }
    }
}
