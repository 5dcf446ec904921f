use std::collections::BTreeMap;

use xxhash_rust::xxh3::xxh3_64;

/// Label set attached to a sample. A sorted map, so two label sets that are
/// equal as sets always canonicalize identically regardless of how they
/// were built.
pub type Labels = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    /// Label used in Prometheus `# TYPE` lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

/// A sample's accumulated value. Counters are integral and never decrease;
/// gauges are floating point and floored at zero on decrement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Counter(i64),
    Gauge(f64),
}

impl MetricValue {
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricValue::Counter(_) => MetricKind::Counter,
            MetricValue::Gauge(_) => MetricKind::Gauge,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            MetricValue::Counter(v) => *v as f64,
            MetricValue::Gauge(v) => *v,
        }
    }
}

/// One live sample per (name, label set) identity.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub labels: Labels,
    pub value: MetricValue,
}

impl MetricSample {
    pub fn kind(&self) -> MetricKind {
        self.value.kind()
    }
}

/// Condense a non-empty label set into a fixed-width token. `Labels`
/// iterates in ascending key order, so the canonical form is deterministic
/// by construction. Returns `None` for an empty set.
pub fn label_token(labels: &Labels) -> Option<String> {
    if labels.is_empty() {
        return None;
    }

    let mut canonical = String::new();
    for (key, value) in labels {
        canonical.push_str(key);
        canonical.push('=');
        canonical.push_str(value);
        // Unit separator: keys and values cannot collide across entries.
        canonical.push('\u{1f}');
    }

    Some(format!("{:016x}", xxh3_64(canonical.as_bytes())))
}

/// Derive the identity key for a metric: the bare name when the label set is
/// empty, otherwise the name plus the condensed label token.
pub fn metric_key(name: &str, labels: &Labels) -> String {
    match label_token(labels) {
        Some(token) => format!("{name}:{token}"),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_labels_key_is_the_name() {
        assert_eq!(metric_key("reverb_up", &Labels::new()), "reverb_up");
    }

    #[test]
    fn insertion_order_does_not_change_identity() {
        let mut a = Labels::new();
        a.insert("app_id".into(), "app-1".into());
        a.insert("type".into(), "public".into());

        let mut b = Labels::new();
        b.insert("type".into(), "public".into());
        b.insert("app_id".into(), "app-1".into());

        assert_eq!(metric_key("reverb_channels_active", &a), metric_key("reverb_channels_active", &b));
    }

    #[test]
    fn different_label_sets_get_different_identities() {
        let mut a = Labels::new();
        a.insert("app_id".into(), "app-1".into());

        let mut b = Labels::new();
        b.insert("app_id".into(), "app-2".into());

        assert_ne!(metric_key("reverb_connections_total", &a), metric_key("reverb_connections_total", &b));
    }

    #[test]
    fn key_token_is_fixed_width() {
        let mut labels = Labels::new();
        labels.insert("a".into(), "b".into());
        let key = metric_key("m", &labels);
        assert_eq!(key.len(), "m:".len() + 16);
    }
}
