//! Lifecycle collector: translates connection/channel/message transitions
//! into store mutations. The component that owns each transition calls in
//! directly; there is no event-dispatch table.

use std::sync::Arc;

use reverbmon_core::errors::StoreResult;
use reverbmon_core::models::{ChannelType, Labels};
use reverbmon_core::traits::MetricsStore;

use crate::registry;

pub struct ReverbMetricsCollector {
    store: Arc<dyn MetricsStore>,
}

impl ReverbMetricsCollector {
    pub fn new(store: Arc<dyn MetricsStore>) -> Self {
        Self { store }
    }

    /// Record a new connection.
    pub fn connection_opened(&self, app_id: &str) -> StoreResult<()> {
        let labels = app_labels(app_id);
        self.store.increment(registry::CONNECTIONS_CREATED_TOTAL, &labels, 1)?;
        self.store.increment_gauge(registry::CONNECTIONS_TOTAL, &labels, 1.0)
    }

    /// Record a closed connection. `reason` is "normal" for a clean close,
    /// "pruned" when the server dropped an idle connection.
    pub fn connection_closed(&self, app_id: &str, reason: &str) -> StoreResult<()> {
        let mut labels = app_labels(app_id);
        labels.insert("reason".to_string(), reason.to_string());
        self.store.increment(registry::CONNECTIONS_CLOSED_TOTAL, &labels, 1)?;
        self.store.decrement_gauge(registry::CONNECTIONS_TOTAL, &app_labels(app_id), 1.0)
    }

    /// Record a received message.
    pub fn message_received(&self, app_id: &str, channel_type: ChannelType) -> StoreResult<()> {
        self.store.increment(
            registry::MESSAGES_RECEIVED_TOTAL,
            &channel_labels(app_id, channel_type),
            1,
        )
    }

    /// Record a sent message.
    pub fn message_sent(&self, app_id: &str, channel_type: ChannelType) -> StoreResult<()> {
        self.store.increment(
            registry::MESSAGES_SENT_TOTAL,
            &channel_labels(app_id, channel_type),
            1,
        )
    }

    /// Record a channel coming alive.
    pub fn channel_created(&self, app_id: &str, channel_type: ChannelType) -> StoreResult<()> {
        self.store.increment_gauge(
            registry::CHANNELS_ACTIVE,
            &type_labels(app_id, channel_type),
            1.0,
        )
    }

    /// Record a channel being vacated.
    pub fn channel_removed(&self, app_id: &str, channel_type: ChannelType) -> StoreResult<()> {
        self.store.decrement_gauge(
            registry::CHANNELS_ACTIVE,
            &type_labels(app_id, channel_type),
            1.0,
        )
    }

    /// Record a subscription.
    pub fn subscription_created(&self, app_id: &str, channel_type: ChannelType) -> StoreResult<()> {
        self.store.increment(
            registry::SUBSCRIPTIONS_TOTAL,
            &channel_labels(app_id, channel_type),
            1,
        )
    }

    /// Set the static server-info sample.
    pub fn set_server_info(&self, instance: &str, version: &str) -> StoreResult<()> {
        let mut labels = Labels::new();
        labels.insert("instance".to_string(), instance.to_string());
        labels.insert("version".to_string(), version.to_string());
        self.store.gauge(registry::SERVER_INFO, 1.0, &labels)
    }

    pub fn store(&self) -> &Arc<dyn MetricsStore> {
        &self.store
    }
}

fn app_labels(app_id: &str) -> Labels {
    let mut labels = Labels::new();
    labels.insert("app_id".to_string(), app_id.to_string());
    labels
}

fn channel_labels(app_id: &str, channel_type: ChannelType) -> Labels {
    let mut labels = app_labels(app_id);
    labels.insert("channel_type".to_string(), channel_type.as_str().to_string());
    labels
}

/// `reverb_channels_active` uses `type` rather than `channel_type`; the
/// label name is part of the exposition contract.
fn type_labels(app_id: &str, channel_type: ChannelType) -> Labels {
    let mut labels = app_labels(app_id);
    labels.insert("type".to_string(), channel_type.as_str().to_string());
    labels
}
