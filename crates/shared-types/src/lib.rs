//! # Shared Types Crate
//!
//! This crate contains the domain entities shared by every subsystem that
//! inspects the network's federated trust configuration.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Node identity and quorum-set shapes are
//!   defined once here.
//! - **Value Identity**: `NodeId` is compared, hashed and ordered by its
//!   key bytes, never by position.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
