//! Domain layer for the Quorum Intersection subsystem
//!
//! Pure analysis of a quorum-slice configuration snapshot. Nothing here
//! performs I/O; logging goes through `tracing` only.
//!
//! - bitset: word-packed node index sets
//! - slice_node / graph: threshold trees over dense node indices
//! - scc: Tarjan decomposition of the dependency graph
//! - quorum: maximal-quorum contraction and minimality
//! - enumerator: backtracking search for a minimal quorum with a disjoint twin

mod bitset;
mod config;
mod context;
mod enumerator;
mod graph;
mod quorum;
mod scc;
mod slice_node;
mod stats;

pub use bitset::*;
pub use config::*;
pub use context::*;
pub use enumerator::*;
pub use graph::*;
pub use scc::*;
pub use slice_node::*;
pub use stats::*;
