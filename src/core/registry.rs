//! Process-lifetime gauge registry.
//!
//! The registry maps namespaced metric keys to gauge cells. It is
//! constructed once at startup and shared by handle between the poll
//! executor (writer) and the scrape handler (reader). Get-or-create is the
//! only mutation path that adds entries; entries are never removed, so the
//! key set grows monotonically over the process lifetime.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, RwLock,
    },
};

use thiserror::Error;

/// Errors raised by the gauge registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The key contains characters the exposition format cannot carry.
    /// This marks a key-construction defect, not a runtime condition, and
    /// is surfaced immediately rather than masked.
    #[error("Metric key {key:?} is not exposition-safe")]
    InvalidKey { key: String },
}

/// A single gauge cell: the latest numeric reading for one metric key.
///
/// The value is stored as the raw bits of the `f64` in an `AtomicU64`, so
/// a concurrent scrape never observes a torn write.
#[derive(Debug)]
pub struct Gauge {
    bits: AtomicU64,
}

impl Gauge {
    /// New cells start at zero.
    fn new() -> Self {
        Gauge {
            bits: AtomicU64::new(0f64.to_bits()),
        }
    }

    /// Overwrites the current value. Last write wins; no smoothing or
    /// history.
    pub fn set(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Returns the current value.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// Exposition-safe keys are ASCII lowercase alphanumerics, underscores,
/// and the colon separators introduced by key derivation and namespacing.
fn is_exposition_safe(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b':'))
}

/// Registry mapping metric keys to gauge cells.
pub struct GaugeRegistry {
    namespace: String,
    cells: RwLock<BTreeMap<String, Arc<Gauge>>>,
}

impl GaugeRegistry {
    /// Creates an empty registry. The namespace is prepended as
    /// `<namespace>:` to every key on lookup and creation.
    pub fn new(namespace: impl Into<String>) -> Self {
        GaugeRegistry {
            namespace: namespace.into(),
            cells: RwLock::new(BTreeMap::new()),
        }
    }

    /// Returns the cell registered under `<namespace>:<key>`, inserting a
    /// fresh zero-valued cell on first sight.
    ///
    /// Repeated calls with the same key return the same underlying cell,
    /// so writes through any returned handle are visible through all
    /// others.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidKey` for keys the exposition format
    /// would reject. Key derivation only emits safe characters for sane
    /// sensor names; hitting this means a name needs fixing upstream.
    pub fn get_or_create(&self, key: &str) -> Result<Arc<Gauge>, RegistryError> {
        let full = format!("{}:{}", self.namespace, key);
        if !is_exposition_safe(&full) {
            return Err(RegistryError::InvalidKey { key: full });
        }

        if let Some(cell) = self.read_cells().get(&full) {
            return Ok(Arc::clone(cell));
        }

        let mut cells = self.cells.write().expect("gauge registry lock poisoned");
        let cell = cells.entry(full).or_insert_with(|| Arc::new(Gauge::new()));
        Ok(Arc::clone(cell))
    }

    /// Renders the current values as the plain-text scrape listing, one
    /// `<namespace>:<key> <value>` line per cell, sorted by key.
    ///
    /// Cells are read independently; a scrape may observe a mix of old and
    /// new values across cells from the same poll tick.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, cell) in self.read_cells().iter() {
            out.push_str(&format!("{} {}\n", key, cell.get()));
        }
        out
    }

    /// Number of registered cells.
    pub fn len(&self) -> usize {
        self.read_cells().len()
    }

    /// True if no cells have been registered yet.
    pub fn is_empty(&self) -> bool {
        self.read_cells().is_empty()
    }

    fn read_cells(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, Arc<Gauge>>> {
        self.cells.read().expect("gauge registry lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_start_at_zero() {
        let registry = GaugeRegistry::new("hue");
        let cell = registry.get_or_create("hallway:presence").unwrap();
        assert_eq!(cell.get(), 0.0);
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let registry = GaugeRegistry::new("hue");

        let first = registry.get_or_create("hallway:presence").unwrap();
        let second = registry.get_or_create("hallway:presence").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);

        // A write through either handle is visible through the other.
        first.set(1.0);
        assert_eq!(second.get(), 1.0);
        second.set(0.0);
        assert_eq!(first.get(), 0.0);
    }

    #[test]
    fn keys_are_namespaced_on_insertion() {
        let registry = GaugeRegistry::new("hue");
        registry.get_or_create("hallway:temperature").unwrap();

        let listing = registry.render();
        assert!(listing.starts_with("hue:hallway:temperature "));
    }

    #[test]
    fn key_set_only_grows() {
        let registry = GaugeRegistry::new("hue");
        assert!(registry.is_empty());

        registry.get_or_create("a:x").unwrap();
        registry.get_or_create("b:x").unwrap();
        assert_eq!(registry.len(), 2);

        // Re-observing known keys adds nothing.
        registry.get_or_create("a:x").unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unsafe_keys_are_rejected() {
        let registry = GaugeRegistry::new("hue");

        let result = registry.get_or_create("hall way:presence");
        assert!(matches!(result, Err(RegistryError::InvalidKey { .. })));

        let result = registry.get_or_create("café:temperature");
        assert!(matches!(result, Err(RegistryError::InvalidKey { .. })));

        // Nothing was inserted on the failed paths.
        assert!(registry.is_empty());
    }

    #[test]
    fn render_lists_sorted_key_value_lines() {
        let registry = GaugeRegistry::new("hue");
        registry.get_or_create("kitchen:lightlevel").unwrap().set(12000.0);
        registry.get_or_create("hallway:presence").unwrap().set(1.0);
        registry.get_or_create("hallway:temperature").unwrap().set(21.5);

        let listing = registry.render();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(
            lines,
            vec![
                "hue:hallway:presence 1",
                "hue:hallway:temperature 21.5",
                "hue:kitchen:lightlevel 12000",
            ]
        );
    }
}
