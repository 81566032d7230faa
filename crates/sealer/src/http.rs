//! HTTP client for the sealing service
//!
//! Endpoints (relative to the configured base URL):
//! - `POST storage/seal?cid=<root>&session_key=<key>&is_link=<bool>` with the
//!   block bytes as body; 200 answers `{path, message, status_code}` where a
//!   non-zero `status_code` is a business rejection
//! - `POST storage/unseal` with `{"path": "<location>"}`; 200 answers the raw
//!   bytes, 404 means nothing is stored there

use crate::client::{SealReply, SealingClient};
use crate::config::SealerConfig;
use crate::error::SealError;
use crate::session::SessionKey;
use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use dagseal_core::NodeId;
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct SealResponse {
    #[serde(default)]
    path: String,
    #[serde(default)]
    message: String,
    status_code: i64,
}

/// Sealing client speaking to the service over HTTP
pub struct HttpSealingClient {
    url: RwLock<String>,
    client: Client,
}

impl HttpSealingClient {
    /// Default service base URL
    pub const DEFAULT_URL: &'static str = "http://127.0.0.1:12222/api/v0";

    /// Create a client for `url` with a per-request `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: RwLock::new(url.into()),
            client,
        })
    }

    pub fn from_config(config: &SealerConfig) -> Result<Self> {
        Self::new(config.endpoint.clone(), config.request_timeout())
    }

    /// Point the client at another service instance
    pub fn set_url(&self, url: impl Into<String>) {
        *self.url.write() = url.into();
    }

    pub fn url(&self) -> String {
        self.url.read().clone()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url.read().trim_end_matches('/'), path)
    }

    async fn seal(
        &self,
        root: &NodeId,
        key: &SessionKey,
        is_link: bool,
        payload: Bytes,
    ) -> Result<SealReply> {
        let url = self.endpoint("storage/seal");
        debug!("POST {} (cid={}, is_link={}, {} bytes)", url, root, is_link, payload.len());

        let resp = self
            .client
            .post(&url)
            .query(&[
                ("cid", root.to_string()),
                ("session_key", key.to_string()),
                ("is_link", is_link.to_string()),
            ])
            .body(payload)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(SealError::Status {
                operation: "Seal",
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await?;
        let reply: SealResponse = serde_json::from_slice(&body)?;
        if reply.status_code != 0 {
            warn!(
                "Sealing service rejected block under {} (status_code {}): {}",
                root, reply.status_code, reply.message
            );
            return Ok(SealReply::Rejected {
                message: reply.message,
            });
        }

        Ok(SealReply::Accepted {
            location: reply.path,
        })
    }
}

#[async_trait]
impl SealingClient for HttpSealingClient {
    async fn start_seal(&self, root: &NodeId, key: &SessionKey, payload: Bytes) -> Result<SealReply> {
        self.seal(root, key, true, payload).await
    }

    async fn seal_block(&self, root: &NodeId, key: &SessionKey, payload: Bytes) -> Result<SealReply> {
        self.seal(root, key, false, payload).await
    }

    async fn end_seal(&self, root: &NodeId, key: &SessionKey) -> Result<SealReply> {
        self.seal(root, key, true, Bytes::new()).await
    }

    async fn retrieve(&self, location: &str) -> Result<Option<Bytes>> {
        let url = self.endpoint("storage/unseal");
        debug!("POST {} (path={})", url, location);

        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "path": location }))
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK => Ok(Some(resp.bytes().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            other => Err(SealError::Status {
                operation: "Unseal",
                status: other.as_u16(),
            }),
        }
    }
}
