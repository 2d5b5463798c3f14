//! Application services: URL policy and the lookups it depends on.

pub mod error;
pub mod links;
pub mod resolver;
