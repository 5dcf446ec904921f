//! Poll-based collection: rebuild the store from the broadcasting engine on
//! every export cycle instead of accumulating, so a scrape never serves
//! samples left over from a previous poll.

use std::collections::BTreeMap;
use std::sync::Arc;

use reverbmon_core::config::MetricsConfig;
use reverbmon_core::errors::{CollectError, PollResult};
use reverbmon_core::models::{ApplicationRecord, ChannelType, Labels};
use reverbmon_core::traits::{ApplicationProvider, BroadcastApi, MetricsStore};

use crate::registry;

struct AppStats {
    connections: u64,
    channels: BTreeMap<ChannelType, u64>,
}

pub struct MetricsPoller {
    store: Arc<dyn MetricsStore>,
    provider: Arc<dyn ApplicationProvider>,
    api: Arc<dyn BroadcastApi>,
    instance: String,
    version: String,
    scaling_enabled: bool,
}

impl MetricsPoller {
    pub fn new(
        store: Arc<dyn MetricsStore>,
        provider: Arc<dyn ApplicationProvider>,
        api: Arc<dyn BroadcastApi>,
        config: &MetricsConfig,
        version: impl Into<String>,
    ) -> Self {
        Self {
            store,
            provider,
            api,
            instance: config.instance.clone(),
            version: version.into(),
            scaling_enabled: config.scaling_enabled,
        }
    }

    /// One collection cycle. A failing application is excluded from this
    /// cycle only; the whole cycle fails only when the provider cannot
    /// enumerate applications or the store rejects a write.
    pub fn collect(&self) -> Result<(), CollectError> {
        self.store.clear()?;

        let apps = self.provider.all()?;
        self.record_server_info(apps.len())?;

        let mut up = false;
        let mut total_connections: u64 = 0;
        let mut total_channels: u64 = 0;

        for app in &apps {
            match self.poll_app(app) {
                Ok(stats) => {
                    up = true;
                    self.store.gauge(
                        registry::CONNECTIONS_TOTAL,
                        stats.connections as f64,
                        &app_labels(&app.id),
                    )?;
                    total_connections += stats.connections;

                    for channel_type in ChannelType::ALL {
                        let count = stats.channels.get(&channel_type).copied().unwrap_or(0);
                        self.store.gauge(
                            registry::CHANNELS_ACTIVE,
                            count as f64,
                            &type_labels(&app.id, channel_type),
                        )?;
                        total_channels += count;
                    }
                }
                Err(e) => {
                    tracing::warn!(app_id = %app.id, error = %e, "skipping application for this export cycle");
                }
            }
        }

        self.store.gauge(registry::UP, if up { 1.0 } else { 0.0 }, &Labels::new())?;

        if up {
            self.store.gauge(
                registry::CONNECTIONS_CURRENT,
                total_connections as f64,
                &Labels::new(),
            )?;
            self.store.gauge(registry::CHANNELS_CURRENT, total_channels as f64, &Labels::new())?;
        }

        Ok(())
    }

    fn record_server_info(&self, app_count: usize) -> Result<(), CollectError> {
        let mut labels = Labels::new();
        labels.insert("instance".to_string(), self.instance.clone());
        labels.insert("version".to_string(), self.version.clone());
        labels.insert(
            "scaling_mode".to_string(),
            if self.scaling_enabled { "cluster" } else { "standalone" }.to_string(),
        );
        self.store.gauge(registry::SERVER_INFO, 1.0, &labels)?;
        self.store.gauge(registry::APPS_CONFIGURED, app_count as f64, &Labels::new())?;
        Ok(())
    }

    fn poll_app(&self, app: &ApplicationRecord) -> PollResult<AppStats> {
        let connections = self.api.connection_count(app)?;

        let mut channels: BTreeMap<ChannelType, u64> =
            ChannelType::ALL.iter().map(|t| (*t, 0)).collect();
        for name in self.api.channel_names(app)? {
            *channels.entry(ChannelType::from_name(&name)).or_insert(0) += 1;
        }

        Ok(AppStats { connections, channels })
    }
}

fn app_labels(app_id: &str) -> Labels {
    let mut labels = Labels::new();
    labels.insert("app_id".to_string(), app_id.to_string());
    labels
}

fn type_labels(app_id: &str, channel_type: ChannelType) -> Labels {
    let mut labels = app_labels(app_id);
    labels.insert("type".to_string(), channel_type.as_str().to_string());
    labels
}
