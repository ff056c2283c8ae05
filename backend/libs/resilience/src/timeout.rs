/// Deadline enforcement for outbound calls
///
/// Every call that leaves the process goes through [`with_timeout`] so no
/// request can block its caller forever.
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Upper bound for the whole exchange, including reading the body
    pub duration: Duration,
    /// Upper bound for establishing the TCP connection
    pub connect: Duration,
}

impl TimeoutConfig {
    pub fn from_millis(duration_ms: u64, connect_ms: u64) -> Self {
        Self {
            duration: Duration::from_millis(duration_ms),
            connect: Duration::from_millis(connect_ms),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(10),
            connect: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimeoutError {
    #[error("Operation timed out after {0:?}")]
    Elapsed(Duration),
}

/// Run `future` to completion or fail once `duration` has passed.
///
/// The future's own output, fallible or not, is passed through untouched so
/// callers keep their error types.
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> Result<T, TimeoutError>
where
    F: Future<Output = T>,
{
    timeout(duration, future)
        .await
        .map_err(|_| TimeoutError::Elapsed(duration))
}
