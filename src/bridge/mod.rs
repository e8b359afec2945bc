//! Hue bridge access: snapshot types, error taxonomy, and the REST client.
//!
//! The poll pipeline consumes a single operation (the current sensor
//! snapshot batch) through the `SensorSource` seam defined next to the
//! executor. Discovery, application-key registration, and the one-shot
//! light alert are bootstrap conveniences used from `main`.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::core::value::FieldValue;

pub mod client;

pub use client::HueBridge;

/// One poll's observed state for one sensor.
///
/// Produced fresh each tick and dropped once flattened; snapshots are not
/// retained across ticks.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorSnapshot {
    /// Human-readable sensor name as configured on the bridge.
    pub name: String,

    /// Field name to observed value. Sensors without a state object
    /// flatten to nothing.
    #[serde(default)]
    pub state: BTreeMap<String, FieldValue>,
}

/// Errors from bridge discovery, pairing, or fetches.
///
/// Any of these crossing the poll loop is fatal to the process; the
/// exposition keeps serving last-known values until restart.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Transport-level failure: unreachable bridge, timeout, bad payload.
    #[error("Bridge request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The discovery endpoint answered with an empty bridge list.
    #[error("No bridge found by the discovery endpoint")]
    NoBridgeFound,

    /// Registration was attempted without the link button being pressed.
    #[error("Link button not pressed on the bridge")]
    LinkButtonNotPressed,

    /// Any other error object returned by the bridge API.
    #[error("Bridge API error {code}: {description}")]
    Api { code: i64, description: String },

    /// The bridge answered 200 but the payload did not have the expected
    /// shape.
    #[error("Unexpected bridge response: {0}")]
    UnexpectedResponse(String),
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn snapshot_decodes_heterogeneous_state() {
        let snapshot: SensorSnapshot = serde_json::from_value(json!({
            "name": "Hallway",
            "type": "ZLLPresence",
            "state": {
                "presence": true,
                "temperature": 21.5,
                "battery": "ok"
            }
        }))
        .unwrap();

        assert_eq!(snapshot.name, "Hallway");
        assert_eq!(snapshot.state["presence"], FieldValue::Bool(true));
        assert_eq!(snapshot.state["temperature"], FieldValue::Number(21.5));
        assert!(matches!(snapshot.state["battery"], FieldValue::Other(_)));
    }

    #[test]
    fn snapshot_without_state_decodes_empty() {
        let snapshot: SensorSnapshot =
            serde_json::from_value(json!({ "name": "Dimmer Switch" })).unwrap();
        assert!(snapshot.state.is_empty());
    }
}
