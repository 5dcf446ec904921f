//! Metric store backends and the driver-resolving factory.

mod in_memory;
mod shared;

use std::sync::Arc;

use reverbmon_core::config::{MetricsConfig, StoreDriver};
use reverbmon_core::traits::{MetricsStore, SharedKv};

pub use in_memory::InMemoryMetricsStore;
pub use shared::{InProcessKv, SharedMetricsStore};

/// Construct the store the configuration asks for. `auto` resolves against
/// the monitored server's scaling mode; the shared backend requires a
/// key-value handle and falls back to in-memory without one.
pub fn build_store(
    config: &MetricsConfig,
    kv: Option<Arc<dyn SharedKv>>,
) -> Arc<dyn MetricsStore> {
    match (config.driver.resolve(config.scaling_enabled), kv) {
        (StoreDriver::Shared, Some(kv)) => {
            Arc::new(SharedMetricsStore::new(kv, config.shared.prefix.clone()))
        }
        (StoreDriver::Shared, None) => {
            tracing::warn!("shared metrics driver configured without a shared store; using in-memory");
            Arc::new(InMemoryMetricsStore::new())
        }
        _ => Arc::new(InMemoryMetricsStore::new()),
    }
}
