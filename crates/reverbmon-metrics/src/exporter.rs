//! Prometheus text exposition. The output structure is a wire contract:
//! one HELP/TYPE pair per distinct metric name, one value line per sample,
//! specific escaping and numeric formatting, and a single comment line when
//! the store is empty.

use std::collections::BTreeSet;
use std::sync::Arc;

use reverbmon_core::errors::StoreResult;
use reverbmon_core::models::{MetricSample, MetricValue};
use reverbmon_core::traits::MetricsStore;

use crate::registry;

pub struct PrometheusExporter {
    store: Arc<dyn MetricsStore>,
}

impl PrometheusExporter {
    pub fn new(store: Arc<dyn MetricsStore>) -> Self {
        Self { store }
    }

    /// Render the store's current samples: all counters, then all gauges.
    /// Within a kind, samples enumerate in the store's stable snapshot
    /// order, so repeated exports of an unchanged store are byte-identical.
    pub fn export(&self) -> StoreResult<String> {
        let mut lines: Vec<String> = Vec::new();
        let mut annotated: BTreeSet<String> = BTreeSet::new();

        for sample in self.store.counters()?.values() {
            Self::append_sample(&mut lines, &mut annotated, sample);
        }
        for sample in self.store.gauges()?.values() {
            Self::append_sample(&mut lines, &mut annotated, sample);
        }

        if lines.is_empty() {
            return Ok("# No metrics collected yet\n".to_string());
        }

        Ok(lines.join("\n") + "\n")
    }

    fn append_sample(lines: &mut Vec<String>, annotated: &mut BTreeSet<String>, sample: &MetricSample) {
        if annotated.insert(sample.name.clone()) {
            lines.push(format_header(&sample.name));
        }
        lines.push(format_line(sample));
    }
}

/// `# HELP` and `# TYPE` annotations for a metric name, emitted once on
/// first encounter. Names outside the registry fall back to `untyped`.
fn format_header(name: &str) -> String {
    let (kind, help) = match registry::definition(name) {
        Some(def) => (def.kind.as_str(), def.help),
        None => ("untyped", "No description available"),
    };
    format!("# HELP {name} {help}\n# TYPE {name} {kind}")
}

fn format_line(sample: &MetricSample) -> String {
    let value = format_value(sample.value);

    if sample.labels.is_empty() {
        return format!("{} {}", sample.name, value);
    }

    let labels = sample
        .labels
        .iter()
        .map(|(key, val)| format!("{key}=\"{}\"", escape_label(val)))
        .collect::<Vec<_>>()
        .join(",");

    format!("{}{{{}}} {}", sample.name, labels, value)
}

/// Integers render bare; floats are trimmed to at most six fractional
/// digits with trailing zeros and a dangling decimal point stripped.
fn format_value(value: MetricValue) -> String {
    match value {
        MetricValue::Counter(v) => v.to_string(),
        MetricValue::Gauge(v) if v.is_nan() => "NaN".to_string(),
        MetricValue::Gauge(v) if v.is_infinite() => {
            if v > 0.0 { "+Inf".to_string() } else { "-Inf".to_string() }
        }
        MetricValue::Gauge(v) => {
            let formatted = format!("{v:.6}");
            formatted.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    }
}

fn escape_label(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryMetricsStore;
    use reverbmon_core::models::Labels;

    fn setup() -> (Arc<InMemoryMetricsStore>, PrometheusExporter) {
        let store = Arc::new(InMemoryMetricsStore::new());
        let exporter = PrometheusExporter::new(Arc::clone(&store) as Arc<dyn MetricsStore>);
        (store, exporter)
    }

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn empty_store_exports_the_placeholder_comment() {
        let (_, exporter) = setup();
        assert_eq!(exporter.export().unwrap(), "# No metrics collected yet\n");
    }

    #[test]
    fn exports_counter_with_help_and_type() {
        let (store, exporter) = setup();
        store
            .increment("reverb_connections_created_total", &labels(&[("app_id", "app-1")]), 1)
            .unwrap();

        let output = exporter.export().unwrap();
        assert!(output.contains("# HELP reverb_connections_created_total Total number of WebSocket connections created"));
        assert!(output.contains("# TYPE reverb_connections_created_total counter"));
        assert!(output.contains("reverb_connections_created_total{app_id=\"app-1\"} 1"));
    }

    #[test]
    fn exports_gauge_with_help_and_type() {
        let (store, exporter) = setup();
        store.gauge("reverb_connections_total", 42.0, &labels(&[("app_id", "app-1")])).unwrap();

        let output = exporter.export().unwrap();
        assert!(output.contains("# TYPE reverb_connections_total gauge"));
        assert!(output.contains("reverb_connections_total{app_id=\"app-1\"} 42"));
    }

    #[test]
    fn unlabeled_samples_omit_the_braces() {
        let (store, exporter) = setup();
        store.increment("reverb_subscriptions_total", &Labels::new(), 1).unwrap();
        assert!(exporter.export().unwrap().contains("reverb_subscriptions_total 1"));
    }

    #[test]
    fn one_help_type_pair_per_name_across_label_sets() {
        let (store, exporter) = setup();
        for (app, kind) in [("app-1", "public"), ("app-1", "private"), ("app-2", "public")] {
            store
                .gauge("reverb_channels_active", 1.0, &labels(&[("app_id", app), ("type", kind)]))
                .unwrap();
        }

        let output = exporter.export().unwrap();
        assert_eq!(output.matches("# HELP reverb_channels_active").count(), 1);
        assert_eq!(output.matches("# TYPE reverb_channels_active").count(), 1);
        assert!(output.contains("reverb_channels_active{app_id=\"app-1\",type=\"public\"} 1"));
        assert!(output.contains("reverb_channels_active{app_id=\"app-1\",type=\"private\"} 1"));
        assert!(output.contains("reverb_channels_active{app_id=\"app-2\",type=\"public\"} 1"));
    }

    #[test]
    fn unknown_names_fall_back_to_untyped() {
        let (store, exporter) = setup();
        store.increment("custom_metric_total", &Labels::new(), 1).unwrap();

        let output = exporter.export().unwrap();
        assert!(output.contains("# HELP custom_metric_total No description available"));
        assert!(output.contains("# TYPE custom_metric_total untyped"));
    }

    #[test]
    fn escapes_backslashes_quotes_and_newlines() {
        let (store, exporter) = setup();
        store
            .increment("m", &labels(&[("label", "a \"quoted\" \\path\nnext")]), 1)
            .unwrap();

        let output = exporter.export().unwrap();
        assert!(output.contains(r#"label="a \"quoted\" \\path\nnext""#));
    }

    #[test]
    fn float_values_are_trimmed() {
        assert_eq!(format_value(MetricValue::Gauge(42.5)), "42.5");
        assert_eq!(format_value(MetricValue::Gauge(42.0)), "42");
        assert_eq!(format_value(MetricValue::Gauge(0.1234567)), "0.123457");
        assert_eq!(format_value(MetricValue::Counter(100)), "100");
    }

    #[test]
    fn non_finite_values_render_specially() {
        assert_eq!(format_value(MetricValue::Gauge(f64::NAN)), "NaN");
        assert_eq!(format_value(MetricValue::Gauge(f64::INFINITY)), "+Inf");
        assert_eq!(format_value(MetricValue::Gauge(f64::NEG_INFINITY)), "-Inf");
    }

    #[test]
    fn counters_render_before_gauges() {
        let (store, exporter) = setup();
        store.gauge("reverb_up", 1.0, &Labels::new()).unwrap();
        store.increment("reverb_subscriptions_total", &Labels::new(), 1).unwrap();

        let output = exporter.export().unwrap();
        let counter_at = output.find("reverb_subscriptions_total 1").unwrap();
        let gauge_at = output.find("reverb_up 1").unwrap();
        assert!(counter_at < gauge_at);
    }
}
