/// Resilience patterns for Campus services
///
/// - **Timeout**: every outbound call carries a finite deadline
/// - **Presets**: tuned deadlines per call type
///
/// There is no retry helper. Callers that need one must choose its bound
/// and backoff, and only for idempotent calls.
///
/// # Example: bounded inter-service call
///
/// ```rust,no_run
/// use resilience::{presets, with_timeout};
///
/// #[tokio::main]
/// async fn main() {
///     let config = presets::http_internal_config();
///
///     let result = with_timeout(config.duration, async {
///         // Your HTTP call here
///         Ok::<_, String>(())
///     })
///     .await;
/// }
/// ```

pub mod presets;
pub mod timeout;

pub use presets::{http_internal_config, verification_config};
pub use timeout::{with_timeout, TimeoutConfig, TimeoutError};
