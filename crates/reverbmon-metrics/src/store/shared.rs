use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use reverbmon_core::errors::{StoreError, StoreResult};
use reverbmon_core::models::{label_token, Labels, MetricKind, MetricSample, MetricValue};
use reverbmon_core::traits::{MetricsSnapshot, MetricsStore, SharedKv};

/// Labels and name persisted next to each sample value, so enumeration can
/// rebuild full samples from the key-value store alone.
#[derive(Debug, Serialize, Deserialize)]
struct LabelPayload {
    labels: Labels,
    name: String,
}

/// Multi-process store. Every sample lives under a namespaced key in the
/// external shared store; counter and gauge deltas go through the store's
/// atomic increment primitives so concurrent server processes never lose
/// updates. Live keys are tracked per kind for enumeration and bulk clear.
pub struct SharedMetricsStore {
    kv: Arc<dyn SharedKv>,
    prefix: String,
}

impl SharedMetricsStore {
    pub fn new(kv: Arc<dyn SharedKv>, prefix: impl Into<String>) -> Self {
        Self { kv, prefix: prefix.into() }
    }

    fn value_key(&self, kind: MetricKind, name: &str, labels: &Labels) -> String {
        let token = label_token(labels).unwrap_or_else(|| "default".to_string());
        format!("{}{}:{}:{}", self.prefix, kind.as_str(), name, token)
    }

    fn tracker_key(&self, kind: MetricKind) -> String {
        format!("{}{}_keys", self.prefix, kind.as_str())
    }

    /// Write the labels companion and register the value key in the
    /// kind tracker. Every mutation path ends here.
    fn register(
        &self,
        kind: MetricKind,
        value_key: &str,
        name: &str,
        labels: &Labels,
    ) -> StoreResult<()> {
        let payload = LabelPayload { labels: labels.clone(), name: name.to_string() };
        let json = serde_json::to_string(&payload)
            .map_err(|e| StoreError::Serialization { message: e.to_string() })?;
        self.kv.set(&format!("{value_key}:labels"), &json)?;
        self.kv.set_add(&self.tracker_key(kind), value_key)
    }

    fn snapshot(&self, kind: MetricKind) -> StoreResult<MetricsSnapshot> {
        let mut samples = MetricsSnapshot::new();

        for key in self.kv.set_members(&self.tracker_key(kind))? {
            // A tracked key whose value has been deleted out from under us
            // is not an error; the sample is simply gone.
            let Some(raw) = self.kv.get(&key)? else {
                continue;
            };

            let payload = match self.kv.get(&format!("{key}:labels"))? {
                Some(json) => serde_json::from_str::<LabelPayload>(&json)
                    .map_err(|e| StoreError::Serialization { message: e.to_string() })?,
                None => LabelPayload { labels: Labels::new(), name: String::new() },
            };

            let value = match kind {
                MetricKind::Counter => MetricValue::Counter(raw.parse::<i64>().map_err(|e| {
                    StoreError::Serialization { message: format!("counter at {key}: {e}") }
                })?),
                MetricKind::Gauge => MetricValue::Gauge(raw.parse::<f64>().map_err(|e| {
                    StoreError::Serialization { message: format!("gauge at {key}: {e}") }
                })?),
            };

            samples.insert(
                key,
                MetricSample { name: payload.name, labels: payload.labels, value },
            );
        }

        Ok(samples)
    }
}

impl MetricsStore for SharedMetricsStore {
    fn increment(&self, name: &str, labels: &Labels, value: i64) -> StoreResult<()> {
        let key = self.value_key(MetricKind::Counter, name, labels);
        self.kv.incr_by(&key, value)?;
        self.register(MetricKind::Counter, &key, name, labels)
    }

    fn gauge(&self, name: &str, value: f64, labels: &Labels) -> StoreResult<()> {
        let key = self.value_key(MetricKind::Gauge, name, labels);
        self.kv.set(&key, &value.to_string())?;
        self.register(MetricKind::Gauge, &key, name, labels)
    }

    fn increment_gauge(&self, name: &str, labels: &Labels, delta: f64) -> StoreResult<()> {
        let key = self.value_key(MetricKind::Gauge, name, labels);
        self.kv.incr_by_float(&key, delta)?;
        self.register(MetricKind::Gauge, &key, name, labels)
    }

    fn decrement_gauge(&self, name: &str, labels: &Labels, delta: f64) -> StoreResult<()> {
        let key = self.value_key(MetricKind::Gauge, name, labels);

        // Read-compute-set, flooring at zero. Best-effort under concurrency:
        // a decrement observing a stale value may floor above the true
        // minimum momentarily, which is acceptable for observational data.
        let current = match self.kv.get(&key)? {
            Some(raw) => raw.parse::<f64>().unwrap_or(0.0),
            None => 0.0,
        };
        let next = (current - delta).max(0.0);

        self.kv.set(&key, &next.to_string())?;
        self.register(MetricKind::Gauge, &key, name, labels)
    }

    fn counters(&self) -> StoreResult<MetricsSnapshot> {
        self.snapshot(MetricKind::Counter)
    }

    fn gauges(&self) -> StoreResult<MetricsSnapshot> {
        self.snapshot(MetricKind::Gauge)
    }

    fn clear(&self) -> StoreResult<()> {
        for kind in [MetricKind::Counter, MetricKind::Gauge] {
            let tracker = self.tracker_key(kind);
            for key in self.kv.set_members(&tracker)? {
                self.kv.del(&key)?;
                self.kv.del(&format!("{key}:labels"))?;
            }
            self.kv.del(&tracker)?;
        }
        Ok(())
    }
}

/// In-process [`SharedKv`] backend. The real deployment points at an
/// external store shared by every server process; this one backs tests and
/// single-process setups that still want the shared key layout.
#[derive(Debug, Default)]
pub struct InProcessKv {
    strings: DashMap<String, String>,
    sets: DashMap<String, BTreeSet<String>>,
}

impl InProcessKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SharedKv for InProcessKv {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.strings.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.strings.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn incr_by(&self, key: &str, delta: i64) -> StoreResult<i64> {
        // The entry guard holds the shard lock, making read-modify-write
        // atomic per key.
        let mut entry = self.strings.entry(key.to_string()).or_insert_with(|| "0".to_string());
        let current = entry
            .parse::<i64>()
            .map_err(|_| StoreError::backend(format!("value at {key} is not an integer")))?;
        let next = current + delta;
        *entry = next.to_string();
        Ok(next)
    }

    fn incr_by_float(&self, key: &str, delta: f64) -> StoreResult<f64> {
        let mut entry = self.strings.entry(key.to_string()).or_insert_with(|| "0".to_string());
        let current = entry
            .parse::<f64>()
            .map_err(|_| StoreError::backend(format!("value at {key} is not a number")))?;
        let next = current + delta;
        *entry = next.to_string();
        Ok(next)
    }

    fn set_add(&self, key: &str, member: &str) -> StoreResult<()> {
        self.sets.entry(key.to_string()).or_default().insert(member.to_string());
        Ok(())
    }

    fn set_members(&self, key: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .sets
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn del(&self, key: &str) -> StoreResult<()> {
        self.strings.remove(key);
        self.sets.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (Arc<InProcessKv>, SharedMetricsStore) {
        let kv = Arc::new(InProcessKv::new());
        let store = SharedMetricsStore::new(Arc::clone(&kv) as Arc<dyn SharedKv>, "test:");
        (kv, store)
    }

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn counter_deltas_go_through_atomic_increment() {
        let (_, store) = store();
        let l = labels(&[("app_id", "app-1")]);
        store.increment("reverb_subscriptions_total", &l, 1).unwrap();
        store.increment("reverb_subscriptions_total", &l, 2).unwrap();

        let counters = store.counters().unwrap();
        assert_eq!(counters.len(), 1);
        let sample = counters.values().next().unwrap();
        assert_eq!(sample.value, MetricValue::Counter(3));
        assert_eq!(sample.name, "reverb_subscriptions_total");
        assert_eq!(sample.labels, l);
    }

    #[test]
    fn unlabeled_samples_use_the_default_token() {
        let (kv, store) = store();
        store.increment("reverb_subscriptions_total", &Labels::new(), 1).unwrap();
        assert_eq!(
            kv.get("test:counter:reverb_subscriptions_total:default").unwrap(),
            Some("1".to_string())
        );
    }

    #[test]
    fn decrement_floors_at_zero() {
        let (_, store) = store();
        let l = labels(&[("app_id", "app-1")]);
        store.gauge("reverb_connections_total", 5.0, &l).unwrap();
        store.decrement_gauge("reverb_connections_total", &l, 10.0).unwrap();

        let gauges = store.gauges().unwrap();
        assert_eq!(gauges.values().next().unwrap().value, MetricValue::Gauge(0.0));
    }

    #[test]
    fn vanished_value_keys_are_skipped_on_enumeration() {
        let (kv, store) = store();
        store.gauge("reverb_up", 1.0, &Labels::new()).unwrap();
        kv.del("test:gauge:reverb_up:default").unwrap();

        assert!(store.gauges().unwrap().is_empty());
    }

    #[test]
    fn clear_removes_values_companions_and_trackers() {
        let (kv, store) = store();
        let l = labels(&[("app_id", "app-1")]);
        store.increment("c", &l, 1).unwrap();
        store.gauge("g", 2.0, &l).unwrap();

        store.clear().unwrap();

        assert!(store.counters().unwrap().is_empty());
        assert!(store.gauges().unwrap().is_empty());
        assert!(kv.set_members("test:counter_keys").unwrap().is_empty());
        assert!(kv.set_members("test:gauge_keys").unwrap().is_empty());
        let value_key = format!("test:counter:c:{}", label_token(&l).unwrap());
        assert_eq!(kv.get(&value_key).unwrap(), None);
        assert_eq!(kv.get(&format!("{value_key}:labels")).unwrap(), None);
    }
}
