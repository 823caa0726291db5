//! Configuration for the apply-side consistency check.

use std::time::Duration;

/// Tuning for [`AclWriter`](crate::AclWriter).
#[derive(Debug, Clone)]
pub struct SecretsConfig {
    /// How many times to read back a write before giving up.
    pub verify_attempts: u32,
    /// Upper bound (exclusive) of the random sleep before each read-back.
    pub max_jitter: Duration,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            verify_attempts: 5,
            max_jitter: Duration::from_secs(2),
        }
    }
}

impl SecretsConfig {
    /// Set the number of read-back attempts.
    pub fn with_verify_attempts(mut self, attempts: u32) -> Self {
        self.verify_attempts = attempts;
        self
    }

    /// Set the jitter bound. `Duration::ZERO` disables sleeping.
    pub fn with_max_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SecretsConfig::default();
        assert_eq!(config.verify_attempts, 5);
        assert_eq!(config.max_jitter, Duration::from_secs(2));
    }

    #[test]
    fn test_builder() {
        let config = SecretsConfig::default()
            .with_verify_attempts(3)
            .with_max_jitter(Duration::from_millis(250));
        assert_eq!(config.verify_attempts, 3);
        assert_eq!(config.max_jitter, Duration::from_millis(250));
    }
}
