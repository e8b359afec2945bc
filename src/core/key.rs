//! Metric key derivation.

/// Derives the metric key for one observed (sensor, field) pair.
///
/// The sensor name is lowercased and every space becomes an underscore,
/// producing a slug that is joined to the field name with a colon:
/// `"Motion Sensor"` / `"presence"` yields `motion_sensor:presence`.
/// Equal inputs always yield the identical key. The namespace prefix is
/// applied by the registry on lookup, not here.
pub fn metric_key(sensor_name: &str, field_name: &str) -> String {
    let slug = sensor_name.to_lowercase().replace(' ', "_");
    format!("{}:{}", slug, field_name)
}
