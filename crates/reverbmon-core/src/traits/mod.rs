//! Capability traits at the seams: metric storage, the shared key-value
//! store, the application-config provider, and the broadcasting engine's
//! query API.

mod application_provider;
mod broadcast;
mod metrics_store;
mod shared_kv;

pub use application_provider::ApplicationProvider;
pub use broadcast::BroadcastApi;
pub use metrics_store::{MetricsSnapshot, MetricsStore};
pub use shared_kv::SharedKv;
