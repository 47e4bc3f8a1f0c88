//! Timeout Helper
//!
//! Wraps async operations with a deadline and a consistent timeout error.
//! Every completion call in the pipeline runs through this so a hung
//! provider can never block a batch indefinitely.

use std::future::Future;
use std::time::Duration;

use crate::types::{DocuError, Result};

/// Execute an async operation with a timeout.
///
/// Returns `DocuError::Timeout` carrying `operation_name` if the future
/// does not complete within `timeout`.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(DocuError::timeout(operation_name, timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_success() {
        let result = with_timeout(
            Duration::from_secs(1),
            async { Ok::<_, DocuError>(42) },
            "test operation",
        )
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result = with_timeout(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, DocuError>(42)
            },
            "slow operation",
        )
        .await;
        assert!(matches!(result, Err(DocuError::Timeout { .. })));
    }
}
