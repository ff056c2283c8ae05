/// Preset timeouts for the kinds of calls Campus services make
use crate::timeout::TimeoutConfig;
use std::time::Duration;

/// Internal service-to-service HTTP data calls
///
/// - Timeout: 10s (course and exam payloads can be large)
/// - Connect: 2s (peers are on the same network)
pub fn http_internal_config() -> TimeoutConfig {
    TimeoutConfig {
        duration: Duration::from_secs(10),
        connect: Duration::from_secs(2),
    }
}

/// Remote session verification
///
/// - Timeout: 3s (the verdict is tiny and on every request's hot path)
/// - Connect: 500ms
pub fn verification_config() -> TimeoutConfig {
    TimeoutConfig {
        duration: Duration::from_secs(3),
        connect: Duration::from_millis(500),
    }
}
