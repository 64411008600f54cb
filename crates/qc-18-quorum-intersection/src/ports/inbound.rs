//! Driving ports (Inbound API)

use serde::{Deserialize, Serialize};
use shared_types::NodeId;

use crate::domain::CheckerStats;
use crate::error::QuorumIntersectionResult;

/// Two disjoint quorums, by node identity.
///
/// `left` is a minimal quorum found by the search (or the quorum of a
/// non-maximal SCC); `right` is a quorum sharing no node with it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotentialSplit {
    pub left: Vec<NodeId>,
    pub right: Vec<NodeId>,
}

/// Primary Quorum Intersection API
pub trait QuorumIntersectionApi {
    /// Decide whether every pair of quorums in the network intersects.
    ///
    /// `Err` means the run stopped early and nothing is known; it is
    /// never a substitute for `Ok(true)`.
    fn network_enjoys_quorum_intersection(&mut self) -> QuorumIntersectionResult<bool>;

    /// Witness of the last `Ok(false)` verdict.
    fn potential_split(&self) -> Option<PotentialSplit>;

    /// Non-empty maximal-quorum fixed points reached during the last run.
    fn max_quorums_found(&self) -> u64;

    /// Counters of the last run.
    fn stats(&self) -> &CheckerStats;
}
