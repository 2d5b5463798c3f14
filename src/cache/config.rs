//! Cache manager connection configuration.

use std::time::Duration;

use url::Url;

/// Connection settings for the external cache manager.
#[derive(Debug, Clone, Default)]
pub struct CacheManagerConfig {
    /// Base URL of the cache manager. `None` disables invalidation.
    pub host: Option<Url>,
    /// Upper bound for a single request. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl From<&crate::config::CacheManagerSettings> for CacheManagerConfig {
    fn from(settings: &crate::config::CacheManagerSettings) -> Self {
        Self {
            host: settings.host.clone(),
            request_timeout: settings.request_timeout,
        }
    }
}

impl CacheManagerConfig {
    pub fn with_host(host: Url) -> Self {
        Self {
            host: Some(host),
            request_timeout: None,
        }
    }

    /// Returns true if a cache manager host is configured.
    pub fn is_enabled(&self) -> bool {
        self.host.is_some()
    }
}
