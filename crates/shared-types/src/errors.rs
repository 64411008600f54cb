//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;

/// Errors that can occur when parsing a node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeIdError {
    /// Input is not valid hexadecimal.
    #[error("Invalid node id hex: {0}")]
    InvalidHex(String),

    /// Decoded key has the wrong number of bytes.
    #[error("Invalid node id length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
