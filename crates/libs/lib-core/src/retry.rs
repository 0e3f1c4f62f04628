//! Single immediate retry for transient failures.

use std::future::Future;

use tracing::warn;

use crate::error::Result;

/// Run `call`; if it fails with a retryable error, run it exactly once more.
///
/// Non-retryable errors (rejections, bad input) are returned untouched.
pub async fn retry_once<T, F, Fut>(operation: &'static str, mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match call().await {
        Ok(value) => Ok(value),
        Err(err) if err.is_retryable() => {
            warn!(operation, error = %err, "Call failed, retrying once");
            call().await
        }
        Err(err) => Err(err),
    }
}
