//! Timeout enforcement for store calls.

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use std::future::Future;
use std::time::Duration;

use crate::storage::{ByteStream, StorageError, StorageResult};

/// Run `fut` with a deadline; expiry becomes [`StorageError::Timeout`].
pub async fn with_deadline<T, F>(limit: Duration, what: &str, fut: F) -> StorageResult<T>
where
    F: Future<Output = StorageResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(StorageError::Timeout(format!("{what} exceeded {limit:?}"))),
    }
}

/// Bound the wait for each body chunk.
///
/// A stalled chunk yields one `Timeout` error and ends the stream. Dropping the
/// returned stream drops the underlying store read.
pub fn idle_bounded(
    body: ByteStream,
    idle: Duration,
    key: String,
) -> impl Stream<Item = StorageResult<Bytes>> + Send {
    futures_util::stream::unfold(Some(body), move |state| {
        let key = key.clone();
        async move {
            let mut body = state?;
            match tokio::time::timeout(idle, body.next()).await {
                Ok(Some(Ok(chunk))) => Some((Ok(chunk), Some(body))),
                Ok(Some(Err(e))) => Some((Err(e), None)),
                Ok(None) => None,
                Err(_) => Some((
                    Err(StorageError::Timeout(format!(
                        "{key}: no body data for {idle:?}"
                    ))),
                    None,
                )),
            }
        }
    })
}
