//! Cache manager integration.
//!
//! Content changes are turned into requests against an external cache
//! manager, which adds, refreshes or drops its cached copy of a URL:
//!
//! - [`CacheTrigger`]: per-event handlers (create, update, delete)
//! - [`InvalidationClient`]: request dispatch and response interpretation
//! - [`Transport`]: the HTTP seam, implemented by [`HttpTransport`]
//!
//! ## Configuration
//!
//! ```toml
//! [cache_manager]
//! host = "http://cache-manager.internal:8080"
//! request_timeout_seconds = 10
//! ```
//!
//! The legacy `CACHE_MANAGER_HOST` environment variable is honored as well.

mod client;
mod config;
mod events;
mod transport;
mod trigger;

pub use client::{InvalidationClient, InvalidationRequest, InvalidationResult};
pub use config::CacheManagerConfig;
pub use events::{ChangeKind, ContentChangeEvent};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};
pub use trigger::{CHANGE_OPERATION, CacheTrigger};
