//! Configuration for sensor polling and metric naming.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Controls how often sensors are polled and how metrics are namespaced.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PollerConfig {
    /// Namespace prepended to every metric key in the exposition listing.
    #[validate(custom(function = "validate_namespace"))]
    pub namespace: String,

    /// Interval (in seconds) at which sensor state is polled.
    ///
    /// Must be at least 1 second.
    #[validate(range(min = 1, message = "Poll interval must be at least 1 second"))]
    pub poll_interval: u64,
}

/// Namespaces must be usable as an exposition identifier prefix: a
/// lowercase letter followed by lowercase letters, digits, or underscores.
fn validate_namespace(namespace: &str) -> Result<(), ValidationError> {
    let mut bytes = namespace.bytes();
    let valid = matches!(bytes.next(), Some(b'a'..=b'z'))
        && bytes.all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_'));

    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_namespace");
        err.message = Some(format!("Invalid metric namespace: {}", namespace).into());
        Err(err)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        PollerConfig {
            namespace: "hue".to_string(),
            poll_interval: 60,
        }
    }
}
