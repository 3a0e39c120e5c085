//! Fetch with a single bounded retry.
//!
//! # Responsibilities
//! - Bound every attempt with the fetch deadline
//! - Retry once, after a jittered backoff, when the failure is transient
//! - Report how many attempts were made

use std::time::Duration;

use crate::config::StoreConfig;
use crate::resilience::backoff::retry_delay;
use crate::resilience::timeouts::with_deadline;
use crate::storage::{ObjectResult, ObjectStore};

/// Outcome of a fetch plus the number of attempts it took.
#[derive(Debug)]
pub struct FetchOutcome {
    pub result: ObjectResult,
    pub attempts: u32,
}

/// Fetch `bucket/key`, retrying at most once on transient errors.
pub async fn fetch_with_retry(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    config: &StoreConfig,
) -> FetchOutcome {
    let max_attempts = if config.retry.enabled {
        config.retry.max_attempts.clamp(1, 2)
    } else {
        1
    };
    let deadline = Duration::from_millis(config.fetch_timeout_ms);
    let mut attempts = 0;

    loop {
        attempts += 1;
        let result = with_deadline(deadline, key, store.get_object(bucket, key)).await;

        match result {
            Err(err) if err.is_transient() && attempts < max_attempts => {
                let delay = retry_delay(attempts, &config.retry);
                tracing::info!(
                    bucket = %bucket,
                    key = %key,
                    attempt = attempts,
                    delay = ?delay,
                    error = %err,
                    "Retrying object fetch"
                );
                tokio::time::sleep(delay).await;
            }
            result => return FetchOutcome { result, attempts },
        }
    }
}
