//! Observed sensor field values and their coercion into gauge readings.
//!
//! The bridge reports each sensor's state as a JSON object with
//! heterogeneous values: numbers, booleans, timestamps, nested structures.
//! Decoding into the closed `FieldValue` union keeps the rest of the
//! pipeline working against a finite variant set instead of raw JSON.

use serde::{Deserialize, Serialize};

/// A single observed value from a sensor's state map.
///
/// Deserialized untagged from the wire; the catch-all variant must stay
/// last so numbers and booleans are matched first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean flags such as `presence` or `dark`.
    Bool(bool),

    /// Any numeric reading. Integers on the wire decode into this variant.
    Number(f64),

    /// Everything without a numeric mapping: strings, arrays, objects, null.
    Other(serde_json::Value),
}

impl FieldValue {
    /// Maps the observed value onto a gauge reading.
    ///
    /// Numbers pass through unchanged, booleans become 1.0/0.0, and `None`
    /// marks a field with no numeric mapping. Callers skip `None` fields
    /// silently; it is an expected per-field outcome, not an error.
    pub fn as_gauge_value(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Bool(true) => Some(1.0),
            FieldValue::Bool(false) => Some(0.0),
            FieldValue::Other(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numbers_pass_through_unchanged() {
        assert_eq!(FieldValue::Number(21.5).as_gauge_value(), Some(21.5));
        assert_eq!(FieldValue::Number(0.0).as_gauge_value(), Some(0.0));
        assert_eq!(FieldValue::Number(-40.0).as_gauge_value(), Some(-40.0));
    }

    #[test]
    fn booleans_map_to_one_and_zero() {
        assert_eq!(FieldValue::Bool(true).as_gauge_value(), Some(1.0));
        assert_eq!(FieldValue::Bool(false).as_gauge_value(), Some(0.0));
    }

    #[test]
    fn unsupported_types_have_no_mapping() {
        assert_eq!(FieldValue::Other(json!("ok")).as_gauge_value(), None);
        assert_eq!(FieldValue::Other(json!(null)).as_gauge_value(), None);
        assert_eq!(
            FieldValue::Other(json!({"nested": 1})).as_gauge_value(),
            None
        );
        assert_eq!(FieldValue::Other(json!([1, 2])).as_gauge_value(), None);
    }

    #[test]
    fn wire_values_decode_into_the_closed_union() {
        let decoded: FieldValue = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(decoded, FieldValue::Bool(true));

        let decoded: FieldValue = serde_json::from_value(json!(2150)).unwrap();
        assert_eq!(decoded, FieldValue::Number(2150.0));

        let decoded: FieldValue = serde_json::from_value(json!(21.5)).unwrap();
        assert_eq!(decoded, FieldValue::Number(21.5));

        let decoded: FieldValue =
            serde_json::from_value(json!("2023-05-01T12:00:00")).unwrap();
        assert!(matches!(decoded, FieldValue::Other(_)));
        assert_eq!(decoded.as_gauge_value(), None);
    }
}
