//! Error types for the Quorum Intersection subsystem
//!
//! Configuration problems in the analysed network are never errors here;
//! they only make slices harder or impossible to satisfy. The errors below
//! are the "undetermined" outcomes of a run and checker misconfiguration.

use thiserror::Error;

/// Errors that can occur while checking quorum intersection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuorumIntersectionError {
    #[error("Quorum intersection check interrupted")]
    Interrupted,

    #[error("Search call budget exhausted: {calls} calls, limit {limit}")]
    CallBudgetExhausted { calls: u64, limit: u64 },

    #[error("Search time budget exhausted: {elapsed_ms}ms elapsed, limit {limit_ms}ms")]
    TimeBudgetExhausted { elapsed_ms: u64, limit_ms: u64 },

    #[error("Invalid checker configuration: {0}")]
    InvalidConfig(String),
}

impl QuorumIntersectionError {
    /// Whether the run stopped before reaching a verdict.
    pub fn is_undetermined(&self) -> bool {
        !matches!(self, Self::InvalidConfig(_))
    }

    /// Short label for metrics and reports.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Interrupted => "interrupted",
            Self::CallBudgetExhausted { .. } => "call_budget",
            Self::TimeBudgetExhausted { .. } => "time_budget",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }
}

/// Result type for quorum intersection operations
pub type QuorumIntersectionResult<T> = Result<T, QuorumIntersectionError>;
