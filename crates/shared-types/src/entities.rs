//! # Core Domain Entities
//!
//! Federated quorum configuration as seen by every subsystem that reasons
//! about trust between validators.
//!
//! ## Clusters
//!
//! - **Identity**: `NodeId`
//! - **Trust**: `QuorumSetConfig`, `QuorumMap`

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::NodeIdError;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// Unique identifier for a node in the network.
///
/// Compared and hashed by value. Serialized as a 64-character hex string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(pub PublicKey);

impl NodeId {
    /// Length of a node id in bytes.
    pub const LEN: usize = 32;

    /// Parse a node id from 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, NodeIdError> {
        let bytes = hex::decode(s.trim()).map_err(|e| NodeIdError::InvalidHex(e.to_string()))?;
        let key: PublicKey = bytes
            .as_slice()
            .try_into()
            .map_err(|_| NodeIdError::InvalidLength {
                expected: Self::LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(key))
    }

    /// Full lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First four bytes in hex, for log lines.
    pub fn short_string(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.short_string())
    }
}

impl FromStr for NodeId {
    type Err = NodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for NodeId {
    type Error = NodeIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_hex()
    }
}

impl From<PublicKey> for NodeId {
    fn from(key: PublicKey) -> Self {
        Self(key)
    }
}

// =============================================================================
// CLUSTER B: TRUST
// =============================================================================

/// A node's quorum-slice requirement.
///
/// Satisfied by a set of nodes when at least `threshold` of its
/// `validators` and satisfied `inner_sets` are covered. Inner sets nest
/// arbitrarily but form a tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuorumSetConfig {
    /// Minimum number of satisfied members (validators plus inner sets).
    pub threshold: u32,
    /// Peers trusted directly.
    #[serde(default)]
    pub validators: Vec<NodeId>,
    /// Nested requirements, each counting as one member.
    #[serde(default)]
    pub inner_sets: Vec<QuorumSetConfig>,
}

impl QuorumSetConfig {
    /// Create a flat quorum set.
    pub fn new(threshold: u32, validators: Vec<NodeId>) -> Self {
        Self {
            threshold,
            validators,
            inner_sets: Vec::new(),
        }
    }

    /// Builder-style method to append a nested quorum set.
    pub fn with_inner_set(mut self, inner: QuorumSetConfig) -> Self {
        self.inner_sets.push(inner);
        self
    }

    /// Every validator mentioned at any nesting level.
    pub fn all_validators(&self) -> BTreeSet<NodeId> {
        let mut out = BTreeSet::new();
        self.collect_validators(&mut out);
        out
    }

    fn collect_validators(&self, out: &mut BTreeSet<NodeId>) {
        out.extend(self.validators.iter().copied());
        for inner in &self.inner_sets {
            inner.collect_validators(out);
        }
    }

    /// Number of members the threshold counts over.
    pub fn member_count(&self) -> usize {
        self.validators.len() + self.inner_sets.len()
    }

    /// Nesting depth; a flat set has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .inner_sets
            .iter()
            .map(QuorumSetConfig::depth)
            .max()
            .unwrap_or(0)
    }
}

/// Snapshot of every known node's quorum set.
///
/// `None` marks a node that is referenced or known but whose configuration
/// is unavailable. Iteration order is the key order, which fixes node
/// index assignment downstream.
pub type QuorumMap = BTreeMap<NodeId, Option<QuorumSetConfig>>;

#[cfg(test)]
mod tests {
    use super::*;

    fn node(b: u8) -> NodeId {
        NodeId([b; 32])
    }

    #[test]
    fn test_node_id_hex_roundtrip() {
        let id = node(0xAB);
        let parsed: NodeId = id.to_hex().parse().expect("valid hex");
        assert_eq!(parsed, id);
        assert_eq!(id.short_string(), "abababab");
    }

    #[test]
    fn test_node_id_rejects_wrong_length() {
        let result = NodeId::from_hex("abcd");
        assert!(matches!(
            result,
            Err(NodeIdError::InvalidLength { expected: 32, actual: 2 })
        ));
    }

    #[test]
    fn test_node_id_rejects_bad_hex() {
        assert!(matches!(
            NodeId::from_hex("zz"),
            Err(NodeIdError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_node_id_json_is_hex_string() {
        let json = serde_json::to_string(&node(1)).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node(1));
    }

    #[test]
    fn test_quorum_set_all_validators_is_transitive() {
        let qset = QuorumSetConfig::new(2, vec![node(1), node(2)])
            .with_inner_set(QuorumSetConfig::new(1, vec![node(3), node(1)]));

        let all: Vec<NodeId> = qset.all_validators().into_iter().collect();
        assert_eq!(all, vec![node(1), node(2), node(3)]);
        assert_eq!(qset.member_count(), 3);
        assert_eq!(qset.depth(), 2);
    }

    #[test]
    fn test_quorum_set_deserialize_defaults() {
        let qset: QuorumSetConfig = serde_json::from_str(r#"{"threshold": 0}"#).unwrap();
        assert_eq!(qset, QuorumSetConfig::default());
    }
}
