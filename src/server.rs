//! Scrape exposition endpoint.
//!
//! Serves the gauge registry's current values as a plain-text listing on
//! `GET /metrics`, one `<key> <value>` line per gauge. The handler only
//! reads; all writes come from the poll executor through the shared
//! registry handle.

use std::sync::Arc;

use axum::{extract::State, routing::get, Router};

use crate::core::registry::GaugeRegistry;

/// Builds the exposition router. `/metrics` is the only route; everything
/// else is a 404.
pub fn build_router(registry: Arc<GaugeRegistry>) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .with_state(registry)
}

async fn metrics(State(registry): State<Arc<GaugeRegistry>>) -> String {
    registry.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn metrics_handler_serves_the_registry_listing() {
        let registry = Arc::new(GaugeRegistry::new("hue"));
        registry.get_or_create("hallway:presence").unwrap().set(1.0);

        let body = metrics(State(registry.clone())).await;
        assert_eq!(body, "hue:hallway:presence 1\n");

        // A scrape after an update sees the new value through the same
        // handler state.
        registry.get_or_create("hallway:presence").unwrap().set(0.0);
        let body = metrics(State(registry)).await;
        assert_eq!(body, "hue:hallway:presence 0\n");
    }

    #[tokio::test]
    async fn empty_registry_serves_an_empty_listing() {
        let registry = Arc::new(GaugeRegistry::new("hue"));
        let body = metrics(State(registry)).await;
        assert!(body.is_empty());
    }
}
