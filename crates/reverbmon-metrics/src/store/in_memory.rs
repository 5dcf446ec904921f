use dashmap::DashMap;

use reverbmon_core::errors::StoreResult;
use reverbmon_core::models::{metric_key, Labels, MetricSample, MetricValue};
use reverbmon_core::traits::{MetricsSnapshot, MetricsStore};

/// Process-local store. Safe to share across threads within one server
/// process; multi-process deployments must use [`super::SharedMetricsStore`]
/// instead, since every process would otherwise export its own partial view.
#[derive(Debug, Default)]
pub struct InMemoryMetricsStore {
    counters: DashMap<String, MetricSample>,
    gauges: DashMap<String, MetricSample>,
}

impl InMemoryMetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(map: &DashMap<String, MetricSample>) -> MetricsSnapshot {
        map.iter().map(|entry| (entry.key().clone(), entry.value().clone())).collect()
    }
}

impl MetricsStore for InMemoryMetricsStore {
    fn increment(&self, name: &str, labels: &Labels, value: i64) -> StoreResult<()> {
        let key = metric_key(name, labels);
        let mut sample = self.counters.entry(key).or_insert_with(|| MetricSample {
            name: name.to_string(),
            labels: labels.clone(),
            value: MetricValue::Counter(0),
        });
        if let MetricValue::Counter(total) = &mut sample.value {
            *total += value;
        }
        Ok(())
    }

    fn gauge(&self, name: &str, value: f64, labels: &Labels) -> StoreResult<()> {
        let key = metric_key(name, labels);
        self.gauges.insert(
            key,
            MetricSample {
                name: name.to_string(),
                labels: labels.clone(),
                value: MetricValue::Gauge(value),
            },
        );
        Ok(())
    }

    fn increment_gauge(&self, name: &str, labels: &Labels, delta: f64) -> StoreResult<()> {
        let key = metric_key(name, labels);
        let mut sample = self.gauges.entry(key).or_insert_with(|| MetricSample {
            name: name.to_string(),
            labels: labels.clone(),
            value: MetricValue::Gauge(0.0),
        });
        if let MetricValue::Gauge(current) = &mut sample.value {
            *current += delta;
        }
        Ok(())
    }

    fn decrement_gauge(&self, name: &str, labels: &Labels, delta: f64) -> StoreResult<()> {
        let key = metric_key(name, labels);
        let mut sample = self.gauges.entry(key).or_insert_with(|| MetricSample {
            name: name.to_string(),
            labels: labels.clone(),
            value: MetricValue::Gauge(0.0),
        });
        if let MetricValue::Gauge(current) = &mut sample.value {
            *current = (*current - delta).max(0.0);
        }
        Ok(())
    }

    fn counters(&self) -> StoreResult<MetricsSnapshot> {
        Ok(Self::snapshot(&self.counters))
    }

    fn gauges(&self) -> StoreResult<MetricsSnapshot> {
        Ok(Self::snapshot(&self.gauges))
    }

    fn clear(&self) -> StoreResult<()> {
        self.counters.clear();
        self.gauges.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn increments_accumulate() {
        let store = InMemoryMetricsStore::new();
        let l = labels(&[("app_id", "app-1")]);
        for _ in 0..3 {
            store.increment("reverb_connections_created_total", &l, 1).unwrap();
        }
        store.increment("reverb_connections_created_total", &l, 5).unwrap();

        let counters = store.counters().unwrap();
        assert_eq!(counters.len(), 1);
        let sample = counters.values().next().unwrap();
        assert_eq!(sample.value, MetricValue::Counter(8));
    }

    #[test]
    fn label_order_collides_to_one_sample() {
        let store = InMemoryMetricsStore::new();
        store.increment("m", &labels(&[("a", "1"), ("b", "2")]), 1).unwrap();
        store.increment("m", &labels(&[("b", "2"), ("a", "1")]), 1).unwrap();

        let counters = store.counters().unwrap();
        assert_eq!(counters.len(), 1);
        assert_eq!(counters.values().next().unwrap().value, MetricValue::Counter(2));
    }

    #[test]
    fn gauge_set_is_last_write_wins() {
        let store = InMemoryMetricsStore::new();
        store.gauge("g", 3.0, &Labels::new()).unwrap();
        store.gauge("g", 7.5, &Labels::new()).unwrap();
        assert_eq!(store.gauges().unwrap()["g"].value, MetricValue::Gauge(7.5));
    }

    #[test]
    fn decrement_floors_at_zero() {
        let store = InMemoryMetricsStore::new();
        store.gauge("g", 5.0, &Labels::new()).unwrap();
        store.decrement_gauge("g", &Labels::new(), 10.0).unwrap();
        assert_eq!(store.gauges().unwrap()["g"].value, MetricValue::Gauge(0.0));
    }

    #[test]
    fn decrement_on_absent_sample_creates_zero() {
        let store = InMemoryMetricsStore::new();
        store.decrement_gauge("g", &Labels::new(), 2.0).unwrap();
        assert_eq!(store.gauges().unwrap()["g"].value, MetricValue::Gauge(0.0));
    }

    #[test]
    fn clear_empties_both_kinds() {
        let store = InMemoryMetricsStore::new();
        store.increment("c", &Labels::new(), 1).unwrap();
        store.gauge("g", 1.0, &Labels::new()).unwrap();
        store.clear().unwrap();
        assert!(store.counters().unwrap().is_empty());
        assert!(store.gauges().unwrap().is_empty());
    }
}
