//! # reverbmon-core
//!
//! Foundation crate for the reverbmon monitoring system.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{FileProviderConfig, MetricsConfig, StoreDriver};
pub use errors::{PollError, ProviderError, ProviderResult, StoreError, StoreResult};
pub use models::{
    ApplicationRecord, ApplicationUpdate, ChannelType, Labels, MetricKind, MetricSample,
    MetricValue,
};
pub use traits::{ApplicationProvider, BroadcastApi, MetricsStore, SharedKv};
