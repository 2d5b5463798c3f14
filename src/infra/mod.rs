//! Infrastructure adapters and runtime bootstrap.

pub mod error;
pub mod links;
pub mod telemetry;
