//! Quorum-slice graph
//!
//! Arena of one `QuorumSliceNode` per configured node. Node `i` depends on
//! node `j` iff `j` is in the transitive closure of node `i`'s slice.

use std::collections::{BTreeSet, HashMap};

use shared_types::{NodeId, QuorumMap};

use super::bitset::BitSet;
use super::slice_node::QuorumSliceNode;

/// Indexed quorum-slice graph built from a `QuorumMap` snapshot.
#[derive(Clone, Debug, Default)]
pub struct QuorumGraph {
    nodes: Vec<QuorumSliceNode>,
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    unconfigured: Vec<NodeId>,
    dangling: BTreeSet<NodeId>,
}

impl QuorumGraph {
    /// Assign dense indices and convert every present configuration.
    ///
    /// Nodes with a configuration get an index in map iteration order.
    /// Nodes mapped to `None` get no index and are recorded as
    /// unconfigured. References to any node without an index are dropped
    /// from the referring slice and recorded as dangling.
    pub fn build(qmap: &QuorumMap) -> Self {
        let mut ids = Vec::with_capacity(qmap.len());
        let mut index = HashMap::with_capacity(qmap.len());
        let mut unconfigured = Vec::new();

        for (id, config) in qmap {
            if config.is_some() {
                index.insert(*id, ids.len());
                ids.push(*id);
            } else {
                unconfigured.push(*id);
            }
        }

        let mut dangling = BTreeSet::new();
        let nodes = qmap
            .values()
            .flatten()
            .map(|config| QuorumSliceNode::from_config(config, &index, &mut dangling))
            .collect();

        Self {
            nodes,
            ids,
            index,
            unconfigured,
            dangling,
        }
    }

    /// Build directly from slice nodes, naming them by the given ids.
    pub fn from_nodes(ids: Vec<NodeId>, nodes: Vec<QuorumSliceNode>) -> Self {
        debug_assert_eq!(ids.len(), nodes.len());
        let index = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        Self {
            nodes,
            ids,
            index,
            unconfigured: Vec::new(),
            dangling: BTreeSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Slice requirement of node `i`.
    pub fn node(&self, i: usize) -> &QuorumSliceNode {
        &self.nodes[i]
    }

    pub fn nodes(&self) -> &[QuorumSliceNode] {
        &self.nodes
    }

    /// Nodes that node `i` depends on.
    pub fn successors(&self, i: usize) -> &BitSet {
        self.nodes[i].transitive_closure()
    }

    pub fn id(&self, i: usize) -> NodeId {
        self.ids[i]
    }

    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Translate a set of indices back to node ids, ascending by index.
    pub fn ids_of(&self, nodes: &BitSet) -> Vec<NodeId> {
        nodes.iter().filter_map(|i| self.ids.get(i).copied()).collect()
    }

    /// Every index in the graph.
    pub fn all_nodes(&self) -> BitSet {
        let mut all = BitSet::with_capacity(self.len());
        for i in 0..self.len() {
            all.set(i);
        }
        all
    }

    /// Nodes present in the map without a configuration.
    pub fn unconfigured(&self) -> &[NodeId] {
        &self.unconfigured
    }

    /// Referenced nodes that have no index.
    pub fn dangling(&self) -> &BTreeSet<NodeId> {
        &self.dangling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::QuorumSetConfig;

    fn node(b: u8) -> NodeId {
        NodeId([b; 32])
    }

    #[test]
    fn test_indices_follow_map_order_and_skip_unconfigured() {
        let mut qmap = QuorumMap::new();
        qmap.insert(node(3), Some(QuorumSetConfig::new(1, vec![node(1)])));
        qmap.insert(node(1), Some(QuorumSetConfig::new(1, vec![node(3)])));
        qmap.insert(node(2), None);

        let graph = QuorumGraph::build(&qmap);

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.index_of(&node(1)), Some(0));
        assert_eq!(graph.index_of(&node(3)), Some(1));
        assert_eq!(graph.index_of(&node(2)), None);
        assert_eq!(graph.unconfigured(), &[node(2)]);
        assert_eq!(graph.successors(0), &BitSet::from_indices([1]));
        assert_eq!(graph.successors(1), &BitSet::from_indices([0]));
    }

    #[test]
    fn test_dangling_references_are_dropped() {
        let mut qmap = QuorumMap::new();
        qmap.insert(
            node(1),
            Some(QuorumSetConfig::new(2, vec![node(1), node(2), node(9)])),
        );
        qmap.insert(node(2), None);

        let graph = QuorumGraph::build(&qmap);

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.node(0).direct_members(), &BitSet::from_indices([0]));
        let dangling: Vec<NodeId> = graph.dangling().iter().copied().collect();
        assert_eq!(dangling, vec![node(2), node(9)]);
    }

    #[test]
    fn test_ids_of_roundtrips_indices() {
        let mut qmap = QuorumMap::new();
        for b in 1..=3 {
            qmap.insert(node(b), Some(QuorumSetConfig::new(1, vec![node(b)])));
        }
        let graph = QuorumGraph::build(&qmap);

        assert_eq!(graph.ids_of(&BitSet::from_indices([0, 2])), vec![node(1), node(3)]);
        assert_eq!(graph.all_nodes(), BitSet::from_indices([0, 1, 2]));
    }

    #[test]
    fn test_empty_map() {
        let graph = QuorumGraph::build(&QuorumMap::new());
        assert!(graph.is_empty());
        assert!(graph.all_nodes().is_empty());
    }
}
