//! Adapters layer (Hexagonal Architecture)

mod name_resolver;

pub use name_resolver::*;
