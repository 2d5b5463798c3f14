//! Invalidation client.
//!
//! Every failure mode (no host configured, transport error, unexpected status,
//! unacknowledged payload) is absorbed here and reported as a failed
//! [`InvalidationResult`]. Nothing past this boundary sees an error.

use std::sync::Arc;

use cache_bridge_api_types::{InvalidationBody, Operation, is_acknowledged};
use metrics::counter;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::config::CacheManagerConfig;
use super::transport::{HttpTransport, Transport, TransportError};

const HTTP_OK: u16 = 200;

/// A single instruction for the cache manager.
///
/// Only built once a URL has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationRequest {
    pub operation: Operation,
    pub url: String,
}

impl InvalidationRequest {
    pub fn new(operation: Operation, url: impl Into<String>) -> Self {
        Self {
            operation,
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InvalidationResult {
    pub succeeded: bool,
    /// Decoded response body, present only when a payload was requested and
    /// the cache manager answered with HTTP 200.
    pub payload: Option<Value>,
}

impl InvalidationResult {
    fn failed() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Disabled,
    TransportError,
    UnexpectedStatus,
    Unacknowledged,
    Acknowledged,
    Payload,
}

impl Outcome {
    fn as_str(self) -> &'static str {
        match self {
            Outcome::Disabled => "disabled",
            Outcome::TransportError => "transport_error",
            Outcome::UnexpectedStatus => "unexpected_status",
            Outcome::Unacknowledged => "unacknowledged",
            Outcome::Acknowledged => "acknowledged",
            Outcome::Payload => "payload",
        }
    }
}

/// Client for the cache manager, either bound to a transport or disabled.
#[derive(Clone)]
pub struct InvalidationClient {
    transport: Option<Arc<dyn Transport>>,
}

impl InvalidationClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport: Some(transport),
        }
    }

    /// A client that fails every call without touching the network.
    pub fn disabled() -> Self {
        Self { transport: None }
    }

    /// Build the process-wide client from configuration.
    ///
    /// A missing host yields a disabled client and a warning for operators.
    pub fn from_config(config: &CacheManagerConfig) -> Result<Self, TransportError> {
        let Some(host) = config.host.as_ref() else {
            warn!(
                setting = "cache_manager.host",
                env = "CACHE_MANAGER_HOST",
                "Cache manager host is not configured; invalidation is disabled"
            );
            return Ok(Self::disabled());
        };

        let transport = HttpTransport::new(config)?;
        info!(
            host = %host,
            timeout_ms = config.request_timeout.map(|timeout| timeout.as_millis() as u64),
            "Cache manager client ready"
        );
        Ok(Self::new(Arc::new(transport)))
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send `operation` for `url`, returning whether the cache manager
    /// acknowledged it.
    pub async fn post(&self, operation: Operation, url: &str) -> bool {
        self.send(&InvalidationRequest::new(operation, url), false)
            .await
            .succeeded
    }

    /// Send `operation` for `url` and return the decoded response body as is.
    pub async fn post_for_payload(&self, operation: Operation, url: &str) -> Option<Value> {
        self.send(&InvalidationRequest::new(operation, url), true)
            .await
            .payload
    }

    /// Ask the cache manager what it holds for `url`.
    pub async fn status(&self, url: &str) -> Option<Value> {
        self.post_for_payload(Operation::Status, url).await
    }

    pub async fn send(
        &self,
        request: &InvalidationRequest,
        want_payload: bool,
    ) -> InvalidationResult {
        let (outcome, result) = self.exchange(request, want_payload).await;

        counter!(
            "cache_bridge_invalidation_total",
            "operation" => request.operation.as_str(),
            "outcome" => outcome.as_str()
        )
        .increment(1);

        if result.succeeded {
            debug!(
                operation = %request.operation,
                url = %request.url,
                outcome = outcome.as_str(),
                "Cache manager request completed"
            );
        } else {
            info!(
                operation = %request.operation,
                url = %request.url,
                outcome = outcome.as_str(),
                "Cache manager request not acknowledged"
            );
        }

        result
    }

    async fn exchange(
        &self,
        request: &InvalidationRequest,
        want_payload: bool,
    ) -> (Outcome, InvalidationResult) {
        let Some(transport) = self.transport.as_ref() else {
            return (Outcome::Disabled, InvalidationResult::failed());
        };

        let body = InvalidationBody::new(request.url.as_str());
        let response = match transport.post_json(request.operation.path(), &body).await {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    operation = %request.operation,
                    url = %request.url,
                    error = %err,
                    "Cache manager request failed"
                );
                return (Outcome::TransportError, InvalidationResult::failed());
            }
        };

        if response.status != HTTP_OK {
            debug!(status = response.status, "Cache manager returned non-200 status");
            return (Outcome::UnexpectedStatus, InvalidationResult::failed());
        }

        let payload = serde_json::from_slice::<Value>(&response.body).unwrap_or_else(|err| {
            debug!(error = %err, "Cache manager response is not valid JSON");
            Value::Null
        });

        if want_payload {
            return (
                Outcome::Payload,
                InvalidationResult {
                    succeeded: true,
                    payload: Some(payload),
                },
            );
        }

        if is_acknowledged(&payload) {
            (
                Outcome::Acknowledged,
                InvalidationResult {
                    succeeded: true,
                    payload: None,
                },
            )
        } else {
            (Outcome::Unacknowledged, InvalidationResult::failed())
        }
    }
}
