//! Startup configuration. Values are passed explicitly into constructors;
//! there is no global registry.

mod metrics_config;
mod provider_config;

pub use metrics_config::{MetricsAuthConfig, MetricsConfig, SharedStoreConfig, StoreDriver};
pub use provider_config::FileProviderConfig;
