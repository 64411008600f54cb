//! Strongly connected components of the dependency graph
//!
//! Tarjan's index/low-link algorithm, driven by an explicit frame stack so
//! deep dependency chains cannot overflow the call stack. Successors are
//! visited in ascending index order, which makes the output deterministic
//! for a fixed graph.

use super::bitset::BitSet;
use super::graph::QuorumGraph;

/// Partition of the graph's node indices into SCCs.
#[derive(Clone, Debug, Default)]
pub struct SccPartition {
    components: Vec<BitSet>,
    max_index: Option<usize>,
}

struct TarjanState {
    index: Vec<Option<usize>>,
    low_link: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
    components: Vec<BitSet>,
}

impl TarjanState {
    fn new(n: usize) -> Self {
        Self {
            index: vec![None; n],
            low_link: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::with_capacity(n),
            next_index: 0,
            components: Vec::new(),
        }
    }

    fn visit(&mut self, v: usize) -> usize {
        let idx = self.next_index;
        self.index[v] = Some(idx);
        self.low_link[v] = idx;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
        idx
    }

    fn pop_component(&mut self, root: usize) {
        let mut component = BitSet::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            component.set(w);
            if w == root {
                break;
            }
        }
        self.components.push(component);
    }

    /// Iterative DFS from `root`; frames are `(node, next successor to try)`.
    fn strong_connect(&mut self, graph: &QuorumGraph, root: usize) {
        self.visit(root);
        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(&(v, cursor)) = frames.last() {
            match graph.successors(v).next_set_bit(cursor) {
                Some(w) => {
                    if let Some(top) = frames.last_mut() {
                        top.1 = w + 1;
                    }
                    match self.index[w] {
                        None => {
                            self.visit(w);
                            frames.push((w, 0));
                        }
                        Some(w_index) if self.on_stack[w] => {
                            self.low_link[v] = self.low_link[v].min(w_index);
                        }
                        Some(_) => {}
                    }
                }
                None => {
                    frames.pop();
                    if let Some(&(parent, _)) = frames.last() {
                        self.low_link[parent] = self.low_link[parent].min(self.low_link[v]);
                    }
                    if Some(self.low_link[v]) == self.index[v] {
                        self.pop_component(v);
                    }
                }
            }
        }
    }
}

impl SccPartition {
    /// Decompose `graph` into strongly connected components.
    ///
    /// The maximal component is the largest one; among equal sizes the
    /// first emitted wins.
    pub fn compute(graph: &QuorumGraph) -> Self {
        let mut state = TarjanState::new(graph.len());
        for v in 0..graph.len() {
            if state.index[v].is_none() {
                state.strong_connect(graph, v);
            }
        }

        let mut max_index = None;
        let mut max_size = 0;
        for (i, component) in state.components.iter().enumerate() {
            let size = component.count();
            if max_index.is_none() || size > max_size {
                max_index = Some(i);
                max_size = size;
            }
        }

        Self {
            components: state.components,
            max_index,
        }
    }

    pub fn components(&self) -> &[BitSet] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Position of the maximal component in [`components`](Self::components).
    pub fn max_index(&self) -> Option<usize> {
        self.max_index
    }

    /// The maximal component, if the graph has any node.
    pub fn max_component(&self) -> Option<&BitSet> {
        self.max_index.map(|i| &self.components[i])
    }
}
