use serde::{Deserialize, Serialize};

use crate::constants;

/// Which metrics-store backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreDriver {
    Memory,
    Shared,
    /// Follow the monitored server's scaling mode: shared when it runs as a
    /// cluster, in-memory when standalone.
    #[default]
    Auto,
}

impl StoreDriver {
    pub fn resolve(self, scaling_enabled: bool) -> StoreDriver {
        match self {
            StoreDriver::Auto if scaling_enabled => StoreDriver::Shared,
            StoreDriver::Auto => StoreDriver::Memory,
            other => other,
        }
    }
}

/// Shared key-value store settings, used when the resolved driver is
/// [`StoreDriver::Shared`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedStoreConfig {
    /// Namespace prefix for every key this system writes.
    pub prefix: String,
}

impl Default for SharedStoreConfig {
    fn default() -> Self {
        Self { prefix: constants::DEFAULT_SHARED_PREFIX.to_string() }
    }
}

/// Access control for the metrics endpoint. Enforcement belongs to the HTTP
/// layer in front of this core; these are only the configured values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsAuthConfig {
    pub token: Option<String>,
    pub allowed_ips: Vec<String>,
}

/// Metrics subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub driver: StoreDriver,
    pub shared: SharedStoreConfig,
    pub auth: MetricsAuthConfig,
    /// Instance identifier reported in `reverb_server_info`.
    pub instance: String,
    /// Whether the monitored server runs in cluster (multi-process) mode.
    pub scaling_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            driver: StoreDriver::Auto,
            shared: SharedStoreConfig::default(),
            auth: MetricsAuthConfig::default(),
            instance: "localhost".to_string(),
            scaling_enabled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_driver_follows_scaling_mode() {
        assert_eq!(StoreDriver::Auto.resolve(true), StoreDriver::Shared);
        assert_eq!(StoreDriver::Auto.resolve(false), StoreDriver::Memory);
        assert_eq!(StoreDriver::Memory.resolve(true), StoreDriver::Memory);
        assert_eq!(StoreDriver::Shared.resolve(false), StoreDriver::Shared);
    }
}
