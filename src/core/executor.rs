//! Sensor polling and flattening executor.
//!
//! The `Executor` is responsible for periodically fetching sensor snapshots
//! from the bridge and flattening every observed field into the gauge
//! registry. It runs for the lifetime of the process; the only way out of
//! the loop is a fatal error.

use std::sync::Arc;

use tokio::time::{sleep, Duration, Instant};
use tracing::{info, trace};

use super::{
    key::metric_key,
    registry::{GaugeRegistry, RegistryError},
};
use crate::bridge::{BridgeError, SensorSnapshot};

/// Trait for sources that can produce the current sensor snapshot batch.
#[async_trait::async_trait]
pub trait SensorSource: Send + Sync {
    /// Fetches one snapshot per sensor known to the source.
    async fn sensor_snapshots(&self) -> Result<Vec<SensorSnapshot>, BridgeError>;
}

/// Errors that abort the poll loop.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// The snapshot fetch failed. Deliberately fatal: the loop neither
    /// retries nor backs off, and the exposition keeps serving last-known
    /// values until the process is restarted.
    #[error("Sensor fetch failed: {0}")]
    Fetch(#[from] BridgeError),

    /// A derived metric key was rejected by the registry. This marks a
    /// key-construction defect and is never masked.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Executor that manages periodic fetching and flattening of sensor state.
pub struct Executor {
    source: Arc<dyn SensorSource>,
    registry: Arc<GaugeRegistry>,
    interval: Duration,
}

impl Executor {
    /// Creates a new Executor instance.
    ///
    /// # Arguments
    /// * `source` - Arc-wrapped snapshot source (the bridge client)
    /// * `registry` - Shared gauge registry the loop writes into
    /// * `interval` - Fixed delay between poll ticks
    pub fn new(
        source: Arc<dyn SensorSource>,
        registry: Arc<GaugeRegistry>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            registry,
            interval,
        }
    }

    /// Runs the poll loop until a fatal error.
    ///
    /// The first fetch happens immediately; the interval wait follows each
    /// completed batch. Individual fields without a numeric mapping are
    /// skipped without failing the batch.
    pub async fn run(self) -> Result<(), PollError> {
        info!(
            "Sensor polling started (interval: {}s)",
            self.interval.as_secs()
        );

        loop {
            let start = Instant::now();

            let snapshots = self.source.sensor_snapshots().await?;
            trace!("Fetched {} sensor snapshots", snapshots.len());

            for snapshot in &snapshots {
                // Raw snapshot record for operator visibility.
                info!("{} {:?}", snapshot.name, snapshot.state);
                self.record(snapshot)?;
            }

            let elapsed = start.elapsed();
            if elapsed < self.interval {
                sleep(self.interval - elapsed).await;
            }
        }
    }

    /// Flattens one snapshot into the registry.
    fn record(&self, snapshot: &SensorSnapshot) -> Result<(), RegistryError> {
        for (field, value) in &snapshot.state {
            let Some(reading) = value.as_gauge_value() else {
                trace!(
                    "Skipping field '{}' on '{}': no numeric mapping",
                    field,
                    snapshot.name
                );
                continue;
            };

            let gauge = self
                .registry
                .get_or_create(&metric_key(&snapshot.name, field))?;
            gauge.set(reading);
        }
        Ok(())
    }
}
