use std::collections::BTreeMap;

use crate::errors::StoreResult;
use crate::models::{Labels, MetricSample};

/// Snapshot of one metric kind, keyed by sample identity. Sorted, so
/// repeated reads with no mutation in between enumerate identically.
pub type MetricsSnapshot = BTreeMap<String, MetricSample>;

/// Counter/gauge storage keyed by name + label set.
///
/// At most one live sample exists per identity. Callers from multiple
/// processes must use a shared backend; the in-memory backend is
/// process-local only.
pub trait MetricsStore: Send + Sync {
    /// Add `value` to a counter's accumulated total, creating the sample at
    /// zero first if absent. Counters never decrease.
    fn increment(&self, name: &str, labels: &Labels, value: i64) -> StoreResult<()>;

    /// Absolute gauge set, last write wins.
    fn gauge(&self, name: &str, value: f64, labels: &Labels) -> StoreResult<()>;

    /// Relative gauge adjustment.
    fn increment_gauge(&self, name: &str, labels: &Labels, delta: f64) -> StoreResult<()>;

    /// Relative gauge adjustment, floored at zero: a decrement racing ahead
    /// of its paired increment never exposes a negative gauge to scrapers.
    fn decrement_gauge(&self, name: &str, labels: &Labels, delta: f64) -> StoreResult<()>;

    fn counters(&self) -> StoreResult<MetricsSnapshot>;

    fn gauges(&self) -> StoreResult<MetricsSnapshot>;

    /// Empty all stored samples. Used when metrics are rebuilt from a poll
    /// on every export instead of accumulated incrementally.
    fn clear(&self) -> StoreResult<()>;
}
