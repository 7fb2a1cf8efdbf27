//! Executor settings.

use std::time::Duration;

/// Time allowed for one exchange, from dispatch to the last body byte.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

/// Settings fixed at construction and shared by every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    pub timeout: Duration,
}

impl ExecutorConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
