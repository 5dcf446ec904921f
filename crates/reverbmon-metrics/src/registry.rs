//! Metric names and their HELP/TYPE annotations.
//!
//! Using a central module for these constants prevents typos and keeps the
//! collector, poller, and exporter in agreement about what each series
//! means.

use reverbmon_core::models::MetricKind;

/// Whether the monitored server is reachable (gauge, 1 or 0).
pub const UP: &str = "reverb_up";

/// Current active connections per app (gauge). Maintained by the lifecycle
/// collector and overwritten by the poller on each export cycle.
pub const CONNECTIONS_TOTAL: &str = "reverb_connections_total";

/// Total current connections across all apps (gauge).
pub const CONNECTIONS_CURRENT: &str = "reverb_connections_current";

/// Connections ever opened, labeled by `app_id` (counter).
pub const CONNECTIONS_CREATED_TOTAL: &str = "reverb_connections_created_total";

/// Connections closed, labeled by `app_id` and `reason` (counter).
pub const CONNECTIONS_CLOSED_TOTAL: &str = "reverb_connections_closed_total";

/// Messages received, labeled by `app_id` and `channel_type` (counter).
pub const MESSAGES_RECEIVED_TOTAL: &str = "reverb_messages_received_total";

/// Messages sent, labeled by `app_id` and `channel_type` (counter).
pub const MESSAGES_SENT_TOTAL: &str = "reverb_messages_sent_total";

/// Active channels, labeled by `app_id` and `type` (gauge).
pub const CHANNELS_ACTIVE: &str = "reverb_channels_active";

/// Total active channels across all apps (gauge).
pub const CHANNELS_CURRENT: &str = "reverb_channels_current";

/// Channel subscriptions created (counter).
pub const SUBSCRIPTIONS_TOTAL: &str = "reverb_subscriptions_total";

/// Static server information carried in labels, value always 1 (gauge).
pub const SERVER_INFO: &str = "reverb_server_info";

/// Number of configured applications (gauge).
pub const APPS_CONFIGURED: &str = "reverb_apps_configured";

/// Type and help text emitted for a known metric name.
#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    pub kind: MetricKind,
    pub help: &'static str,
}

pub const DEFINITIONS: &[MetricDef] = &[
    MetricDef {
        name: UP,
        kind: MetricKind::Gauge,
        help: "Whether Reverb server is reachable (1 = up, 0 = down)",
    },
    MetricDef {
        name: CONNECTIONS_TOTAL,
        kind: MetricKind::Gauge,
        help: "Current number of active WebSocket connections per app",
    },
    MetricDef {
        name: CONNECTIONS_CURRENT,
        kind: MetricKind::Gauge,
        help: "Total current WebSocket connections across all apps",
    },
    MetricDef {
        name: CONNECTIONS_CREATED_TOTAL,
        kind: MetricKind::Counter,
        help: "Total number of WebSocket connections created",
    },
    MetricDef {
        name: CONNECTIONS_CLOSED_TOTAL,
        kind: MetricKind::Counter,
        help: "Total number of WebSocket connections closed",
    },
    MetricDef {
        name: MESSAGES_RECEIVED_TOTAL,
        kind: MetricKind::Counter,
        help: "Total number of messages received",
    },
    MetricDef {
        name: MESSAGES_SENT_TOTAL,
        kind: MetricKind::Counter,
        help: "Total number of messages sent",
    },
    MetricDef {
        name: CHANNELS_ACTIVE,
        kind: MetricKind::Gauge,
        help: "Current number of active channels by type",
    },
    MetricDef {
        name: CHANNELS_CURRENT,
        kind: MetricKind::Gauge,
        help: "Total current active channels across all apps",
    },
    MetricDef {
        name: SUBSCRIPTIONS_TOTAL,
        kind: MetricKind::Counter,
        help: "Total number of channel subscriptions",
    },
    MetricDef {
        name: SERVER_INFO,
        kind: MetricKind::Gauge,
        help: "Reverb server information",
    },
    MetricDef {
        name: APPS_CONFIGURED,
        kind: MetricKind::Gauge,
        help: "Number of configured WebSocket applications",
    },
];

/// Look up the definition for a metric name. Unknown names are rendered as
/// `untyped` with a placeholder help line by the exporter.
pub fn definition(name: &str) -> Option<&'static MetricDef> {
    DEFINITIONS.iter().find(|def| def.name == name)
}
