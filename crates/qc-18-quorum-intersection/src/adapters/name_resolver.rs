//! Name resolution adapters for diagnostic output

use std::collections::HashMap;

use shared_types::NodeId;

use crate::ports::NodeNameResolver;

/// Names every node by the first four bytes of its key, in hex.
#[derive(Clone, Copy, Debug, Default)]
pub struct HexNameResolver;

impl NodeNameResolver for HexNameResolver {
    fn short_name(&self, id: &NodeId) -> String {
        id.short_string()
    }
}

/// Operator-supplied display names, falling back to hex.
#[derive(Clone, Debug, Default)]
pub struct MapNameResolver {
    names: HashMap<NodeId, String>,
}

impl MapNameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: NodeId, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(NodeId, String)> for MapNameResolver {
    fn from_iter<I: IntoIterator<Item = (NodeId, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

impl NodeNameResolver for MapNameResolver {
    fn short_name(&self, id: &NodeId) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.short_string())
    }
}
