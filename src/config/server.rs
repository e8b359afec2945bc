//! Configuration for the scrape exposition server.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Settings for the HTTP endpoint that serves the metrics listing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the exposition server binds to.
    #[validate(custom(function = "validate_bind_addr"))]
    pub bind: String,
}

/// Validates that the bind address parses as a socket address.
fn validate_bind_addr(bind: &str) -> Result<(), ValidationError> {
    if bind.parse::<SocketAddr>().is_ok() {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_bind_addr");
        err.message = Some(format!("Invalid bind address: {}", bind).into());
        Err(err)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "0.0.0.0:8449".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        ServerConfig::default().validate().unwrap();
    }

    #[test]
    fn hostless_bind_is_rejected() {
        let config = ServerConfig {
            bind: ":8449".into(),
        };
        assert!(config.validate().is_err());
    }
}
