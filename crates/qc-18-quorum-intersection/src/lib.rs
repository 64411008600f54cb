//! # QC-18 Quorum Intersection
//!
//! Static safety analysis of a federated Byzantine agreement network:
//! given every node's quorum-slice configuration, decide whether every two
//! quorums necessarily share a node. A network without that property can
//! fork under Byzantine behavior.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure analysis, no I/O
//!   - `BitSet`: Word-packed set of node indices
//!   - `QuorumSliceNode` / `QuorumGraph`: Threshold trees over dense indices
//!   - `SccPartition`: Tarjan decomposition of the dependency graph
//!   - `MinQuorumEnumerator`: Backtracking search over the maximal SCC
//!   - `CheckerConfig` / `CheckerConfigBuilder`: Budgets and tie-break rule
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `QuorumIntersectionApi`: Driving port (inbound API)
//!   - `NodeNameResolver`: Driven port (diagnostic display names)
//!
//! - **Adapters Layer** (`adapters/`): `HexNameResolver`, `MapNameResolver`
//!
//! - **Service Layer** (`service.rs`): `QuorumIntersectionChecker`
//!
//! ## Invariants
//!
//! - **Budgets never answer**: a run that exhausts its call or time budget,
//!   or is interrupted, returns an error. It is never reported as "holds".
//! - **Tie-break is performance only**: the split-node choice changes how
//!   long the search takes, never the verdict.
//! - **Missing configuration is not an error**: unconfigured nodes and
//!   dangling references are logged and treated as unsatisfiable.
//!
//! ## Usage Example
//!
//! ```ignore
//! use qc_18_quorum_intersection::{
//!     CheckerConfigBuilder, QuorumIntersectionApi, QuorumIntersectionChecker,
//! };
//!
//! let config = CheckerConfigBuilder::new().max_calls(10_000_000).build()?;
//! let mut checker = QuorumIntersectionChecker::new(&quorum_map, config)?;
//!
//! match checker.network_enjoys_quorum_intersection() {
//!     Ok(true) => println!("all quorums intersect"),
//!     Ok(false) => println!("split: {:?}", checker.potential_split()),
//!     Err(e) => println!("undetermined: {e}"),
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{HexNameResolver, MapNameResolver};
pub use domain::{BitSet, CheckerConfig, CheckerConfigBuilder, CheckerStats, TieBreak};
pub use error::{QuorumIntersectionError, QuorumIntersectionResult};
pub use ports::{NodeNameResolver, PotentialSplit, QuorumIntersectionApi};
pub use service::QuorumIntersectionChecker;
