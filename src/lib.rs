//! Bridge between a content-management backend and an external cache manager.
//!
//! Content changes are resolved to canonical public URLs and forwarded to the
//! cache manager, which adds, refreshes or drops its cached copy.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
