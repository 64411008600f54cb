//! Quorum Intersection Service - orchestration of one check
//!
//! # Flow
//! 1. Build the slice graph and its SCC partition once, at construction
//! 2. Per run: a quorum in any SCC other than the maximal one is disjoint
//!    from every quorum of the maximal SCC, so the network splits
//! 3. A maximal SCC without any quorum intersects vacuously
//! 4. Otherwise search the maximal SCC for a minimal quorum with a
//!    disjoint counterpart

use std::collections::BTreeSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use shared_types::{NodeId, QuorumMap};
use tracing::{debug, info, warn};

use crate::adapters::HexNameResolver;
use crate::domain::{
    BitSet, CheckerConfig, CheckerStats, MinQuorumEnumerator, QuorumGraph, SccPartition,
    SearchBudget, SearchContext, TieBreaker,
};
use crate::error::QuorumIntersectionResult;
use crate::metrics;
use crate::ports::{NodeNameResolver, PotentialSplit, QuorumIntersectionApi};

/// Quorum intersection checker over one configuration snapshot
///
/// The graph is immutable once built; each call to
/// [`network_enjoys_quorum_intersection`](QuorumIntersectionApi::network_enjoys_quorum_intersection)
/// starts from fresh statistics and no witness.
pub struct QuorumIntersectionChecker<R: NodeNameResolver = HexNameResolver> {
    graph: QuorumGraph,
    partition: SccPartition,
    config: CheckerConfig,
    resolver: Arc<R>,
    interrupt: Arc<AtomicBool>,
    stats: CheckerStats,
    split: Option<PotentialSplit>,
}

impl QuorumIntersectionChecker<HexNameResolver> {
    /// Create a checker that names nodes by their key prefix in logs.
    pub fn new(qmap: &QuorumMap, config: CheckerConfig) -> QuorumIntersectionResult<Self> {
        Self::with_resolver(qmap, config, Arc::new(HexNameResolver))
    }
}

impl<R: NodeNameResolver> QuorumIntersectionChecker<R> {
    /// Create a checker with a custom diagnostic name resolver.
    pub fn with_resolver(
        qmap: &QuorumMap,
        config: CheckerConfig,
        resolver: Arc<R>,
    ) -> QuorumIntersectionResult<Self> {
        config.validate()?;

        let graph = QuorumGraph::build(qmap);
        let partition = SccPartition::compute(&graph);

        let mut checker = Self {
            graph,
            partition,
            config,
            resolver,
            interrupt: Arc::new(AtomicBool::new(false)),
            stats: CheckerStats::default(),
            split: None,
        };
        checker.stats = checker.base_stats();
        checker.log_graph_summary();
        Ok(checker)
    }

    /// Flag polled by the search; storing `true` stops the current run
    /// with `Interrupted`. The flag is never cleared by the checker.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn graph(&self) -> &QuorumGraph {
        &self.graph
    }

    /// Nodes present in the snapshot without a configuration.
    pub fn unconfigured_nodes(&self) -> &[NodeId] {
        self.graph.unconfigured()
    }

    /// Nodes referenced by some slice that have no configuration.
    pub fn dangling_references(&self) -> &BTreeSet<NodeId> {
        self.graph.dangling()
    }

    pub fn node_count(&self) -> usize {
        self.graph.len()
    }

    pub fn scc_count(&self) -> usize {
        self.partition.len()
    }

    /// Members of the maximal SCC, ascending by index.
    pub fn max_scc_members(&self) -> Vec<NodeId> {
        self.partition
            .max_component()
            .map(|scc| self.graph.ids_of(scc))
            .unwrap_or_default()
    }

    fn base_stats(&self) -> CheckerStats {
        CheckerStats {
            total_nodes: self.graph.len(),
            scc_count: self.partition.len(),
            max_scc_size: self.partition.max_component().map_or(0, BitSet::count),
            ..CheckerStats::default()
        }
    }

    fn log_graph_summary(&self) {
        for id in self.graph.unconfigured() {
            warn!(node = %self.resolver.short_name(id), "Node has no quorum set configuration");
        }
        for id in self.graph.dangling() {
            warn!(node = %self.resolver.short_name(id), "Slice references a node without configuration");
        }
        info!(
            nodes = self.graph.len(),
            sccs = self.partition.len(),
            max_scc_size = self.stats.max_scc_size,
            "Quorum slice graph built"
        );
        debug!(
            max_scc = %self.resolver.render(&self.max_scc_members()),
            "Maximal SCC members"
        );
    }

    /// Translate a witness pair to identities and log it.
    fn record_split(&self, left: &BitSet, right: &BitSet) -> PotentialSplit {
        let split = PotentialSplit {
            left: self.graph.ids_of(left),
            right: self.graph.ids_of(right),
        };
        warn!(
            left = %self.resolver.render(&split.left),
            right = %self.resolver.render(&split.right),
            "Found potential split: disjoint quorums"
        );
        split
    }

    fn run(&mut self, budget: SearchBudget) -> QuorumIntersectionResult<bool> {
        let Some(max_index) = self.partition.max_index() else {
            warn!("No configured nodes, quorum intersection holds vacuously");
            return Ok(true);
        };
        let components = self.partition.components();
        let max_scc = &components[max_index];

        for (i, component) in components.iter().enumerate() {
            if i == max_index {
                continue;
            }
            let quorum = self.graph.contract_to_maximal_quorum(component, &mut self.stats);
            if !quorum.is_empty() {
                warn!(
                    scc = i,
                    size = quorum.count(),
                    "Quorum found outside the maximal SCC"
                );
                let main = self.graph.contract_to_maximal_quorum(max_scc, &mut self.stats);
                self.split = Some(self.record_split(&quorum, &main));
                return Ok(false);
            }
        }

        if !self.graph.contains_quorum(max_scc, &mut self.stats) {
            warn!(
                max_scc_size = max_scc.count(),
                "No quorum in the maximal SCC, network may halt; intersection holds vacuously"
            );
            return Ok(true);
        }

        let tie_breaker = TieBreaker::from_config(&self.config);
        let mut ctx = SearchContext::new(&self.graph, max_scc, &mut self.stats, budget, tie_breaker);
        let found = MinQuorumEnumerator::new(BitSet::new(), max_scc.clone())
            .any_min_quorum_has_disjoint_quorum(&mut ctx)?;
        let witness = ctx.take_split();

        if !found {
            return Ok(true);
        }
        if let Some(witness) = witness {
            self.split = Some(self.record_split(&witness.quorum, &witness.disjoint));
        }
        Ok(false)
    }
}

impl<R: NodeNameResolver> QuorumIntersectionApi for QuorumIntersectionChecker<R> {
    fn network_enjoys_quorum_intersection(&mut self) -> QuorumIntersectionResult<bool> {
        self.stats = self.base_stats();
        self.split = None;

        let started = Instant::now();
        let budget = SearchBudget::from_config(&self.config, Arc::clone(&self.interrupt));
        let result = self.run(budget);

        let elapsed = started.elapsed();
        self.stats.elapsed_ms = elapsed.as_millis() as u64;
        metrics::record_check_latency(elapsed.as_secs_f64());
        metrics::record_enumerator_calls(self.stats.calls_started);

        match &result {
            Ok(intersects) => {
                info!(
                    intersects,
                    elapsed_ms = self.stats.elapsed_ms,
                    "Quorum intersection check finished"
                );
                metrics::record_check_completed(*intersects);
            }
            Err(e) => {
                warn!(error = %e, "Quorum intersection check undetermined");
                metrics::record_check_undetermined(e.reason());
            }
        }

        if self.config.log_stats {
            self.stats.log_summary();
        }
        result
    }

    fn potential_split(&self) -> Option<PotentialSplit> {
        self.split.clone()
    }

    fn max_quorums_found(&self) -> u64 {
        self.stats.max_quorums_seen
    }

    fn stats(&self) -> &CheckerStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MapNameResolver;
    use crate::error::QuorumIntersectionError;
    use shared_types::QuorumSetConfig;
    use std::sync::atomic::Ordering;

    fn node(b: u8) -> NodeId {
        NodeId([b; 32])
    }

    fn symmetric(n: u8, threshold: u32) -> QuorumMap {
        (0..n)
            .map(|i| {
                let others = (0..n).filter(|&j| j != i).map(node).collect();
                (node(i), Some(QuorumSetConfig::new(threshold, others)))
            })
            .collect()
    }

    fn quiet() -> CheckerConfig {
        CheckerConfig {
            log_stats: false,
            ..CheckerConfig::default().deterministic()
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = QuorumIntersectionChecker::new(&symmetric(4, 2), quiet().with_max_calls(0));
        assert!(matches!(result, Err(QuorumIntersectionError::InvalidConfig(_))));
    }

    #[test]
    fn test_intersecting_network() {
        let mut checker = QuorumIntersectionChecker::new(&symmetric(4, 2), quiet()).unwrap();

        assert_eq!(checker.network_enjoys_quorum_intersection(), Ok(true));
        assert!(checker.potential_split().is_none());
        assert!(checker.max_quorums_found() > 0);
        assert_eq!(checker.stats().total_nodes, 4);
        assert_eq!(checker.stats().max_commit, 3);
    }

    #[test]
    fn test_split_network_reports_witness() {
        let mut checker = QuorumIntersectionChecker::new(&symmetric(6, 2), quiet()).unwrap();

        assert_eq!(checker.network_enjoys_quorum_intersection(), Ok(false));
        let split = checker.potential_split().expect("Split should be recorded");
        assert_eq!(split.left.len(), 3);
        assert_eq!(split.right.len(), 3);
        assert!(split.left.iter().all(|id| !split.right.contains(id)));
    }

    #[test]
    fn test_reruns_reset_state() {
        let mut checker = QuorumIntersectionChecker::new(&symmetric(6, 2), quiet()).unwrap();

        assert_eq!(checker.network_enjoys_quorum_intersection(), Ok(false));
        let first = checker.stats().clone();
        assert_eq!(checker.network_enjoys_quorum_intersection(), Ok(false));

        let mut second = checker.stats().clone();
        second.elapsed_ms = first.elapsed_ms;
        assert_eq!(first, second, "Deterministic reruns should repeat exactly");
    }

    #[test]
    fn test_interrupt_before_run() {
        let mut checker = QuorumIntersectionChecker::new(&symmetric(6, 2), quiet()).unwrap();
        checker.interrupt_handle().store(true, Ordering::Relaxed);

        assert_eq!(
            checker.network_enjoys_quorum_intersection(),
            Err(QuorumIntersectionError::Interrupted)
        );
        assert!(checker.potential_split().is_none());
    }

    #[test]
    fn test_diagnostics_accessors() {
        let mut qmap = symmetric(3, 2);
        qmap.insert(node(9), None);
        qmap.insert(
            node(5),
            Some(QuorumSetConfig::new(1, vec![node(0), node(7)])),
        );

        let checker = QuorumIntersectionChecker::new(&qmap, quiet()).unwrap();

        assert_eq!(checker.node_count(), 4);
        assert_eq!(checker.unconfigured_nodes(), &[node(9)]);
        assert!(checker.dangling_references().contains(&node(7)));
        assert_eq!(checker.scc_count(), 2);
        assert_eq!(checker.max_scc_members(), vec![node(0), node(1), node(2)]);
    }

    #[test]
    fn test_custom_resolver_does_not_change_verdict() {
        let qmap = symmetric(6, 2);
        let names: MapNameResolver = (0..6u8).map(|i| (node(i), format!("v{i}"))).collect();

        let mut named =
            QuorumIntersectionChecker::with_resolver(&qmap, quiet(), Arc::new(names)).unwrap();
        let mut plain = QuorumIntersectionChecker::new(&qmap, quiet()).unwrap();

        assert_eq!(
            named.network_enjoys_quorum_intersection(),
            plain.network_enjoys_quorum_intersection()
        );
    }

    #[test]
    fn test_empty_snapshot_holds_vacuously() {
        let mut checker = QuorumIntersectionChecker::new(&QuorumMap::new(), quiet()).unwrap();
        assert_eq!(checker.network_enjoys_quorum_intersection(), Ok(true));
        assert_eq!(checker.max_quorums_found(), 0);
        assert!(checker.max_scc_members().is_empty());
    }
}
