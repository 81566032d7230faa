//! Sealing service contract

use crate::session::SessionKey;
use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use dagseal_core::NodeId;

/// Service answer to a seal request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SealReply {
    /// Block sealed; `location` is the handle for later retrieval
    Accepted { location: String },
    /// The service declined this content for now (not a transport fault)
    Rejected { message: String },
}

/// Request/response adapter to the external sealing service
///
/// Every call is anchored at the root of the sealing operation and carries its
/// session key, so the service can group all blocks of one operation.
#[async_trait]
pub trait SealingClient: Send + Sync {
    /// Open a session by sealing the root block
    async fn start_seal(&self, root: &NodeId, key: &SessionKey, payload: Bytes) -> Result<SealReply>;

    /// Seal one non-root block under the session
    async fn seal_block(&self, root: &NodeId, key: &SessionKey, payload: Bytes) -> Result<SealReply>;

    /// Close the session
    async fn end_seal(&self, root: &NodeId, key: &SessionKey) -> Result<SealReply>;

    /// Fetch the original bytes behind a location; `None` when the service
    /// reports nothing stored there
    async fn retrieve(&self, location: &str) -> Result<Option<Bytes>>;
}

#[async_trait]
impl<T: SealingClient + ?Sized> SealingClient for std::sync::Arc<T> {
    async fn start_seal(&self, root: &NodeId, key: &SessionKey, payload: Bytes) -> Result<SealReply> {
        (**self).start_seal(root, key, payload).await
    }

    async fn seal_block(&self, root: &NodeId, key: &SessionKey, payload: Bytes) -> Result<SealReply> {
        (**self).seal_block(root, key, payload).await
    }

    async fn end_seal(&self, root: &NodeId, key: &SessionKey) -> Result<SealReply> {
        (**self).end_seal(root, key).await
    }

    async fn retrieve(&self, location: &str) -> Result<Option<Bytes>> {
        (**self).retrieve(location).await
    }
}
