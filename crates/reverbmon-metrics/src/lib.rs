//! # reverbmon-metrics
//!
//! Metrics collection and export: counter/gauge stores (in-memory and
//! shared), the Prometheus text exporter, the WebSocket lifecycle
//! collector, and the poller that rebuilds the store from the broadcasting
//! engine on every export.

pub mod collector;
pub mod exporter;
pub mod poller;
pub mod registry;
pub mod store;
pub mod tracing_setup;

pub use collector::ReverbMetricsCollector;
pub use exporter::PrometheusExporter;
pub use poller::MetricsPoller;
pub use store::{build_store, InMemoryMetricsStore, InProcessKv, SharedMetricsStore};
