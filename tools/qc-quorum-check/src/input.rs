//! Quorum map snapshot format
//!
//! ```json
//! {"nodes": [{"node": "<64 hex chars>", "name": "optional",
//!             "qset": {"t": 2, "v": ["<hex>", {"t": 1, "v": ["<hex>"]}]}}]}
//! ```
//!
//! `qset` may be `null` or missing for nodes whose configuration is unknown.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use qc_18_quorum_intersection::MapNameResolver;
use serde::Deserialize;
use shared_types::{NodeId, QuorumMap, QuorumSetConfig};
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<NodeEntry>,
}

#[derive(Debug, Deserialize)]
pub struct NodeEntry {
    pub node: NodeId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub qset: Option<QsetJson>,
}

#[derive(Debug, Deserialize)]
pub struct QsetJson {
    pub t: u32,
    #[serde(default)]
    pub v: Vec<QsetEntry>,
}

/// A validator key or a nested quorum set.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum QsetEntry {
    Node(NodeId),
    Inner(QsetJson),
}

impl From<QsetJson> for QuorumSetConfig {
    fn from(qset: QsetJson) -> Self {
        let mut validators = Vec::new();
        let mut inner_sets = Vec::new();
        for entry in qset.v {
            match entry {
                QsetEntry::Node(id) => validators.push(id),
                QsetEntry::Inner(inner) => inner_sets.push(inner.into()),
            }
        }
        QuorumSetConfig {
            threshold: qset.t,
            validators,
            inner_sets,
        }
    }
}

impl Snapshot {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid quorum map snapshot")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&json).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Split into the checker input and the display names.
    ///
    /// A node listed twice keeps its last entry.
    pub fn into_parts(self) -> (QuorumMap, MapNameResolver) {
        let mut qmap = QuorumMap::new();
        let mut names = MapNameResolver::new();

        for entry in self.nodes {
            if let Some(name) = entry.name {
                names.insert(entry.node, name);
            }
            if qmap.insert(entry.node, entry.qset.map(Into::into)).is_some() {
                warn!(node = %entry.node.short_string(), "Duplicate node entry, keeping the last one");
            }
        }
        (qmap, names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_18_quorum_intersection::NodeNameResolver;

    fn hex(b: u8) -> String {
        NodeId([b; 32]).to_hex()
    }

    #[test]
    fn test_parse_nested_qset() {
        let json = format!(
            r#"{{"nodes": [{{"node": "{}", "name": "alpha",
                "qset": {{"t": 2, "v": ["{}", {{"t": 1, "v": ["{}", "{}"]}}]}}}}]}}"#,
            hex(1),
            hex(2),
            hex(3),
            hex(4)
        );

        let (qmap, names) = Snapshot::parse(&json).unwrap().into_parts();
        let qset = qmap[&NodeId([1; 32])].clone().expect("Configured");

        assert_eq!(qset.threshold, 2);
        assert_eq!(qset.validators, vec![NodeId([2; 32])]);
        assert_eq!(qset.inner_sets.len(), 1);
        assert_eq!(qset.inner_sets[0].threshold, 1);
        assert_eq!(qset.inner_sets[0].validators, vec![NodeId([3; 32]), NodeId([4; 32])]);
        assert_eq!(names.short_name(&NodeId([1; 32])), "alpha");
    }

    #[test]
    fn test_null_and_missing_qset_are_unconfigured() {
        let json = format!(
            r#"{{"nodes": [{{"node": "{}", "qset": null}}, {{"node": "{}"}}]}}"#,
            hex(1),
            hex(2)
        );

        let (qmap, names) = Snapshot::parse(&json).unwrap().into_parts();

        assert_eq!(qmap.len(), 2);
        assert!(qmap.values().all(Option::is_none));
        assert!(names.is_empty());
    }

    #[test]
    fn test_duplicate_entry_keeps_last() {
        let json = format!(
            r#"{{"nodes": [{{"node": "{0}", "qset": {{"t": 1, "v": []}}}}, {{"node": "{0}", "qset": null}}]}}"#,
            hex(7)
        );

        let (qmap, _) = Snapshot::parse(&json).unwrap().into_parts();
        assert_eq!(qmap.len(), 1);
        assert!(qmap[&NodeId([7; 32])].is_none());
    }

    #[test]
    fn test_rejects_bad_key() {
        let json = r#"{"nodes": [{"node": "abcd", "qset": null}]}"#;
        assert!(Snapshot::parse(json).is_err());
    }

    #[test]
    fn test_rejects_missing_threshold() {
        let json = format!(r#"{{"nodes": [{{"node": "{}", "qset": {{"v": []}}}}]}}"#, hex(1));
        assert!(Snapshot::parse(&json).is_err());
    }
}
