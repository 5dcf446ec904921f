//! Data model: metric samples and identity, application records, channel
//! classification.

mod application;
mod channel;
mod metric;

pub use application::{
    AppOptions, ApplicationRecord, ApplicationSummary, ApplicationUpdate, OptionsUpdate, Scheme,
};
pub use channel::ChannelType;
pub use metric::{label_token, metric_key, Labels, MetricKind, MetricSample, MetricValue};
