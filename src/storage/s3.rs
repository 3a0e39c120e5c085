//! S3-compatible object store using the AWS SDK.

use async_trait::async_trait;
use aws_config::retry::RetryConfig as SdkRetryConfig;
use aws_config::timeout::TimeoutConfig as SdkTimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::{GetObjectError, GetObjectOutput};
use aws_sdk_s3::primitives::DateTimeFormat;
use aws_sdk_s3::Client;
use bytes::Bytes;
use futures_util::StreamExt;
use std::time::Duration;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::config::StoreConfig;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::traits::{ObjectMeta, ObjectResult, ObjectStore, StoredObject};

/// S3-backed object store.
///
/// The bucket is chosen per call so one client serves every namespace.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
}

impl std::fmt::Debug for S3Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Store").finish_non_exhaustive()
    }
}

impl S3Store {
    /// Build a client from the ambient AWS configuration plus overrides in `config`.
    ///
    /// SDK retries are disabled: the gateway performs its own single bounded retry.
    pub async fn connect(config: &StoreConfig) -> Self {
        let timeouts = SdkTimeoutConfig::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .operation_attempt_timeout(Duration::from_millis(config.fetch_timeout_ms))
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .timeout_config(timeouts)
            .retry_config(SdkRetryConfig::disabled());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint {
            let lower = endpoint.to_ascii_lowercase();
            let endpoint = if lower.starts_with("http://") || lower.starts_with("https://") {
                endpoint.clone()
            } else {
                format!("http://{endpoint}")
            };
            builder = builder.endpoint_url(endpoint);
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        tracing::info!(
            region = ?sdk_config.region(),
            endpoint = ?config.endpoint,
            "S3 client configured"
        );

        Self {
            client: Client::from_conf(builder.build()),
        }
    }
}

fn meta_from_output(output: &GetObjectOutput) -> ObjectMeta {
    ObjectMeta {
        content_type: output.content_type().map(str::to_string),
        content_length: output.content_length().and_then(|len| u64::try_from(len).ok()),
        etag: output.e_tag().map(str::to_string),
        last_modified: output
            .last_modified()
            .and_then(|dt| dt.fmt(DateTimeFormat::HttpDate).ok()),
        cache_control: output.cache_control().map(str::to_string),
    }
}

/// Map a GetObject failure onto the gateway's store error classes.
fn classify_get_error(err: SdkError<GetObjectError>, bucket: &str, key: &str) -> StorageError {
    let target = format!("s3://{bucket}/{key}");
    match &err {
        SdkError::TimeoutError(_) => StorageError::Timeout(target),
        SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            StorageError::Transient(format!("{target}: {err}"))
        }
        SdkError::ServiceError(service_err) => {
            let inner = service_err.err();
            if inner.is_no_such_key() {
                return StorageError::NotFound(key.to_string());
            }
            let status = service_err.raw().status().as_u16();
            classify_status(status, inner.code(), key, &target)
        }
        _ => StorageError::Fatal(format!("{target}: {err}")),
    }
}

fn classify_status(status: u16, code: Option<&str>, key: &str, target: &str) -> StorageError {
    match (status, code) {
        (_, Some("NoSuchBucket")) => StorageError::Fatal(format!("{target}: bucket does not exist")),
        (404, _) => StorageError::NotFound(key.to_string()),
        (429 | 500..=599, _) => {
            StorageError::Transient(format!("{target}: store responded {status}"))
        }
        _ => StorageError::Fatal(format!(
            "{target}: store responded {status} ({})",
            code.unwrap_or("unknown")
        )),
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    #[instrument(skip(self), fields(backend = "s3"))]
    async fn get_object(&self, bucket: &str, key: &str) -> ObjectResult {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify_get_error(e, bucket, key))?;

        let meta = meta_from_output(&output);

        // AWS ByteStream → AsyncRead → chunked stream; dropping it aborts the read.
        let reader_stream = ReaderStream::new(output.body.into_async_read());
        let body = reader_stream.map(|chunk| -> StorageResult<Bytes> {
            chunk.map_err(|e| StorageError::Transient(format!("body read failed: {e}")))
        });

        Ok(StoredObject {
            meta,
            body: Box::pin(body),
        })
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
