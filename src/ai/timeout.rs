//! Per-call timeouts
//!
//! Provider calls are bounded with [`with_timeout`]; an expired call becomes
//! an ordinary [`QuizError::Timeout`] and the fallback chain advances.

use std::future::Future;
use std::time::Duration;

use crate::constants::network as net_constants;
use crate::types::{QuizError, Result};

/// Timeouts applied to provider traffic
#[derive(Debug, Clone, Copy)]
pub struct TimeoutConfig {
    /// Whole request, including reading the body
    pub request: Duration,
    /// TCP/TLS connect
    pub connection: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(net_constants::DEFAULT_TIMEOUT_SECS),
            connection: Duration::from_secs(net_constants::CONNECTION_TIMEOUT_SECS),
        }
    }
}

impl TimeoutConfig {
    pub fn with_request_secs(secs: u64) -> Self {
        let request = Duration::from_secs(secs.max(1));
        Self {
            request,
            connection: request.min(Duration::from_secs(net_constants::CONNECTION_TIMEOUT_SECS)),
        }
    }
}

/// Execute an async operation with a timeout
///
/// ```ignore
/// let text = with_timeout(
///     Duration::from_secs(30),
///     provider.generate(&request, key),
///     "gemini request",
/// ).await?;
/// ```
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(QuizError::timeout(operation_name, timeout)),
    }
}
