//! huebee — Hue sensor poller and metrics exporter
//!
//! This crate polls the sensors paired with a Philips Hue bridge on a fixed
//! interval, flattens each sensor's heterogeneous state into numeric gauges,
//! and serves the latest values as a plain-text scrape endpoint. It is
//! designed for long-running operation: the gauge registry lives for the
//! process lifetime and only ever grows.
//!
//! ## Modules
//!
//! * `config` — Configuration structures, loading, validation, and defaults.
//!   Supports TOML configuration files with validation via the `validator`
//!   crate.
//!
//! * `core` — Core runtime components:
//!   - Poll executor driving the fetch-and-flatten cycle
//!   - Gauge registry (get-or-create, process lifetime)
//!   - Metric key derivation
//!   - Observed value coercion
//!
//! * `bridge` — HTTP client for the Hue bridge REST API: discovery,
//!   application-key registration, sensor and light access.
//!
//! * `server` — Scrape exposition: an axum router serving the registry's
//!   current values on `/metrics`.
//!
//! * `logger` — Centralized logging initialization using `tracing`.
//!   Supports console output in multiple formats (compact, pretty, JSON)
//!   and optional systemd journald integration.

pub mod bridge;
pub mod config;
pub mod core;
pub mod logger;
pub mod server;
