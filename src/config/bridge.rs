//! Configuration for the Hue bridge connection.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Connection settings for the bridge the sensors are paired with.
///
/// Both `host` and `username` are optional: a missing host triggers
/// network discovery at startup, and a missing username triggers
/// application-key registration (the bridge's link button must be pressed
/// shortly before).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BridgeConfig {
    /// Bridge address (IP or hostname). Discovered when absent.
    pub host: Option<String>,

    /// Application key for API access. Registered when absent; the key is
    /// logged once so it can be persisted here for later runs.
    pub username: Option<String>,

    /// Device type sent when registering a new application key.
    #[validate(length(min = 1, message = "Device type must not be empty"))]
    pub device_type: String,

    /// Per-request timeout (in seconds) for all bridge and discovery
    /// calls. A hung bridge fails the request instead of stalling a poll
    /// cycle indefinitely.
    #[validate(range(min = 1, message = "Request timeout must be at least 1 second"))]
    pub request_timeout_secs: u64,

    /// Run one visible alert cycle on all lights after connecting.
    pub alert_on_start: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            host: None,
            username: None,
            device_type: "huebee".to_string(),
            request_timeout_secs: 10,
            alert_on_start: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        BridgeConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = BridgeConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_device_type_is_rejected() {
        let config = BridgeConfig {
            device_type: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
