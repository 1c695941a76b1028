//! Configuration types for the client

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default deadline for a call's reply
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default pause between readiness probes while waiting for a reply
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// How long `call` waits for a reply before giving up
    #[serde(with = "duration_serde")]
    pub timeout: Duration,

    /// Sleep between polls of the transport; never longer than the time left
    #[serde(with = "duration_serde")]
    pub poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

// Helper module for Duration serialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.poll_interval, Duration::from_millis(10));
    }

    #[test]
    fn test_durations_serialize_as_millis() {
        let config = ClientConfig::default().with_timeout(Duration::from_millis(250));
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({"timeout": 250, "poll_interval": 10})
        );

        let parsed: ClientConfig = serde_json::from_value(json!({"timeout": 1500})).unwrap();
        assert_eq!(parsed.timeout, Duration::from_millis(1500));
        assert_eq!(parsed.poll_interval, DEFAULT_POLL_INTERVAL);
    }
}
