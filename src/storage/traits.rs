//! Storage trait definitions.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use std::pin::Pin;

use crate::storage::error::{StorageError, StorageResult};

/// A boxed stream of bytes for streaming reads.
pub type ByteStream = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

/// Outcome of a single fetch: found, or one of the classified store errors.
pub type ObjectResult = StorageResult<StoredObject>;

/// Read-only object store abstraction.
///
/// Implementations must be safe for concurrent use; the gateway shares a single
/// handle across all requests.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Fetch an object's metadata and a stream over its body.
    async fn get_object(&self, bucket: &str, key: &str) -> ObjectResult;

    /// Static identifier for logs and metrics (e.g. "s3").
    fn backend_name(&self) -> &'static str;
}

/// Metadata reported by the store for a fetched object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectMeta {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub etag: Option<String>,
    /// Already formatted as an HTTP date.
    pub last_modified: Option<String>,
    pub cache_control: Option<String>,
}

/// A fetched object: metadata plus its body.
pub struct StoredObject {
    pub meta: ObjectMeta,
    pub body: ByteStream,
}

impl StoredObject {
    /// Build an object from an in-memory buffer.
    pub fn from_bytes(meta: ObjectMeta, data: Bytes) -> Self {
        let body = futures_util::stream::once(async move { Ok::<_, StorageError>(data) });
        Self {
            meta,
            body: Box::pin(body),
        }
    }
}

impl std::fmt::Debug for StoredObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredObject")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}
