use std::{future::Future, time::Duration};

use tracing::warn;

use crate::error::Result;

/// Runs `call`; on a retryable failure waits `backoff` and tries exactly once more.
/// A second failure of any kind is returned to the caller.
pub async fn with_backoff<T, F, Fut>(label: &str, backoff: Duration, mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match call().await {
        Err(err) if err.is_retryable() => {
            warn!(
                call = label,
                backoff_secs = backoff.as_secs_f64(),
                error = %err,
                "oracle overloaded, retrying once after backoff"
            );
            tokio::time::sleep(backoff).await;
            call().await
        }
        result => result,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::{Error, oracle_error::OracleError};

    #[tokio::test]
    async fn retries_once_on_rate_limit() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result = with_backoff("test", Duration::ZERO, move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(OracleError::RateLimited("busy".into()).into())
            } else {
                Ok(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn second_rate_limit_is_fatal() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<()> = with_backoff("test", Duration::ZERO, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(OracleError::RateLimited("busy".into()).into())
        })
        .await;
        assert!(matches!(result, Err(Error::OracleError(OracleError::RateLimited(_)))));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn other_errors_are_not_retried() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<()> = with_backoff("test", Duration::ZERO, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(OracleError::InvalidResponse("nope".into()).into())
        })
        .await;
        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
