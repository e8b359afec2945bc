//! HTTP client for the Hue bridge REST API.
//!
//! Talks to a single bridge over its v1 REST interface. All requests share
//! one `reqwest::Client` carrying the configured request timeout, so a
//! hung bridge fails the call instead of blocking a poll cycle forever.

use std::{collections::BTreeMap, time::Duration};

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{BridgeError, SensorSnapshot};
use crate::core::executor::SensorSource;

const DISCOVERY_URL: &str = "https://discovery.meethue.com/";

/// Error type the bridge returns when the link button was not pressed
/// before a registration attempt.
const LINK_BUTTON_NOT_PRESSED: i64 = 101;

#[derive(Debug, Deserialize)]
struct DiscoveredBridge {
    #[serde(rename = "internalipaddress")]
    internal_ip_address: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    code: i64,
    description: String,
}

#[derive(Debug, Deserialize)]
struct RegisterSuccess {
    username: String,
}

/// One element of the array the bridge answers registration with. Exactly
/// one of the two fields is populated.
#[derive(Debug, Deserialize)]
struct RegisterReply {
    success: Option<RegisterSuccess>,
    error: Option<ApiError>,
}

/// A light as listed by the bridge. Only the name is of interest here.
#[derive(Debug, Clone, Deserialize)]
pub struct Light {
    pub name: String,
}

/// Client for one Hue bridge, bound to an application key.
#[derive(Debug, Clone)]
pub struct HueBridge {
    http: reqwest::Client,
    host: String,
    username: String,
}

impl HueBridge {
    /// Builds the shared HTTP client with the configured request timeout.
    pub fn http_client(timeout: Duration) -> Result<reqwest::Client, BridgeError> {
        Ok(reqwest::Client::builder().timeout(timeout).build()?)
    }

    /// Finds a bridge on the local network via the public discovery
    /// endpoint and returns its address.
    pub async fn discover(http: &reqwest::Client) -> Result<String, BridgeError> {
        let bridges: Vec<DiscoveredBridge> = http
            .get(DISCOVERY_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        bridges
            .into_iter()
            .next()
            .map(|bridge| bridge.internal_ip_address)
            .ok_or(BridgeError::NoBridgeFound)
    }

    /// Registers a new application key with the bridge.
    ///
    /// The bridge only grants keys within a short window after its link
    /// button is pressed; outside that window this returns
    /// `BridgeError::LinkButtonNotPressed`.
    pub async fn register(
        http: &reqwest::Client,
        host: &str,
        device_type: &str,
    ) -> Result<String, BridgeError> {
        let replies: Vec<RegisterReply> = http
            .post(format!("http://{}/api", host))
            .json(&json!({ "devicetype": device_type }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let reply = replies.into_iter().next().ok_or_else(|| {
            BridgeError::UnexpectedResponse("empty registration reply".into())
        })?;

        if let Some(success) = reply.success {
            return Ok(success.username);
        }
        match reply.error {
            Some(error) if error.code == LINK_BUTTON_NOT_PRESSED => {
                Err(BridgeError::LinkButtonNotPressed)
            }
            Some(error) => Err(BridgeError::Api {
                code: error.code,
                description: error.description,
            }),
            None => Err(BridgeError::UnexpectedResponse(
                "registration reply carried neither success nor error".into(),
            )),
        }
    }

    /// Creates a client for the bridge at `host` using an existing
    /// application key.
    pub fn new(
        http: reqwest::Client,
        host: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        HueBridge {
            http,
            host: host.into(),
            username: username.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}/api/{}/{}", self.host, self.username, path)
    }

    /// Lists the lights known to the bridge, keyed by bridge-assigned id.
    pub async fn lights(&self) -> Result<BTreeMap<String, Light>, BridgeError> {
        let lights = self
            .http
            .get(self.url("lights"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(lights)
    }

    /// Runs one "select" alert cycle (a single breath) on every light.
    /// Used as a visible liveness check at startup.
    pub async fn alert_all(&self) -> Result<(), BridgeError> {
        for (id, light) in self.lights().await? {
            debug!("Alerting light {} ({})", id, light.name);
            self.http
                .put(self.url(&format!("lights/{}/state", id)))
                .json(&json!({ "alert": "select" }))
                .send()
                .await?
                .error_for_status()?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl SensorSource for HueBridge {
    /// Fetches the current state of every sensor known to the bridge.
    ///
    /// The bridge answers with a map of id → sensor; the ids carry no
    /// metric identity, so only the sensor objects are kept.
    async fn sensor_snapshots(&self) -> Result<Vec<SensorSnapshot>, BridgeError> {
        let sensors: BTreeMap<String, SensorSnapshot> = self
            .http
            .get(self.url("sensors"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(sensors.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sensors_payload_decodes_to_snapshots() {
        let payload = json!({
            "1": {
                "name": "Hallway",
                "type": "ZLLPresence",
                "state": { "presence": false, "lastupdated": "2023-05-01T12:00:00" }
            },
            "2": {
                "name": "Hallway Temp",
                "type": "ZLLTemperature",
                "state": { "temperature": 2150 }
            }
        });

        let sensors: BTreeMap<String, SensorSnapshot> =
            serde_json::from_value(payload).unwrap();
        let snapshots: Vec<SensorSnapshot> = sensors.into_values().collect();

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].name, "Hallway");
        assert_eq!(snapshots[1].state["temperature"].as_gauge_value(), Some(2150.0));
    }

    #[test]
    fn registration_error_101_means_link_button() {
        let reply: RegisterReply = serde_json::from_value(json!({
            "error": {
                "type": 101,
                "address": "",
                "description": "link button not pressed"
            }
        }))
        .unwrap();

        let error = reply.error.unwrap();
        assert_eq!(error.code, LINK_BUTTON_NOT_PRESSED);
        assert!(reply.success.is_none());
    }

    #[test]
    fn registration_success_carries_the_key() {
        let reply: RegisterReply = serde_json::from_value(json!({
            "success": { "username": "abc123" }
        }))
        .unwrap();

        assert_eq!(reply.success.unwrap().username, "abc123");
    }

    #[test]
    fn discovery_payload_decodes() {
        let bridges: Vec<DiscoveredBridge> = serde_json::from_value(json!([
            { "id": "001788fffe000000", "internalipaddress": "192.168.1.20" }
        ]))
        .unwrap();

        assert_eq!(bridges[0].internal_ip_address, "192.168.1.20");
    }
}
