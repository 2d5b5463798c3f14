//! HTTP transport to the cache manager.

use async_trait::async_trait;
use bytes::Bytes;
use cache_bridge_api_types::InvalidationBody;
use reqwest::{Client, Url};
use thiserror::Error;

use super::config::CacheManagerConfig;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("cache manager host is not configured")]
    MissingHost,
    #[error("invalid cache manager URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("http request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Status and raw body of a cache manager reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` as JSON to `path`, relative to the cache manager host.
    async fn post_json(
        &self,
        path: &str,
        body: &InvalidationBody,
    ) -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport bound to a single cache manager host.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base: Url,
}

impl HttpTransport {
    pub fn new(config: &CacheManagerConfig) -> Result<Self, TransportError> {
        let base = config.host.clone().ok_or(TransportError::MissingHost)?;

        let mut builder = Client::builder().user_agent(Self::user_agent());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TransportError::Build)?;

        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("cache-bridge/", env!("CARGO_PKG_VERSION"))
    }

    pub fn url(&self, path: &str) -> Result<Url, TransportError> {
        self.base.join(path).map_err(TransportError::Url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        path: &str,
        body: &InvalidationBody,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.url(path)?;
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(TransportError::Request)?;

        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(TransportError::Body)?;
        Ok(TransportResponse { status, body })
    }
}
