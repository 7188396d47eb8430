use crate::collector::SnapshotCollector;
use crate::error::{CoreError, Result};
use crate::metric::{Metric, MetricType, Sample, StaticLabels};
use crate::names::{is_valid_label_name, is_valid_metric_name};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// A metric whose samples are fixed values, typically read from a file.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotMetric {
    pub name: String,
    #[serde(default)]
    pub help: String,
    #[serde(rename = "type", default)]
    pub metric_type: MetricType,
    #[serde(default)]
    pub label_names: Vec<String>,
    #[serde(default)]
    pub samples: Vec<SnapshotSample>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotSample {
    /// Emitted name; the metric name when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Unquoted YAML scalars (`200`, `true`) are taken as their text.
    #[serde(default, deserialize_with = "scalar_text::many")]
    pub label_values: Vec<String>,
    #[serde(default)]
    pub extra_label: Option<SnapshotExtraLabel>,
    #[serde(deserialize_with = "sample_value::deserialize")]
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotExtraLabel {
    pub name: String,
    #[serde(deserialize_with = "scalar_text::one")]
    pub value: String,
}

/// On-disk layout of a snapshot (YAML or JSON).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub static_labels: StaticLabels,
    #[serde(default)]
    pub metrics: Vec<SnapshotMetric>,
}

impl SnapshotMetric {
    pub fn new(name: impl Into<String>, help: impl Into<String>, metric_type: MetricType) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            metric_type,
            label_names: Vec::new(),
            samples: Vec::new(),
        }
    }

    pub fn with_label_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.label_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sample(mut self, sample: SnapshotSample) -> Self {
        self.samples.push(sample);
        self
    }

    /// Check the name, the label schema, and every sample's label arity.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_metric_name(&self.name) {
            return Err(CoreError::InvalidMetricName(self.name.clone()));
        }
        for label in &self.label_names {
            self.check_label_name(label)?;
        }
        for sample in &self.samples {
            if let Some(name) = &sample.name {
                if !is_valid_metric_name(name) {
                    return Err(CoreError::InvalidMetricName(name.clone()));
                }
            }
            if sample.label_values.len() != self.label_names.len() {
                return Err(CoreError::LabelArity {
                    metric: self.name.clone(),
                    expected: self.label_names.len(),
                    actual: sample.label_values.len(),
                });
            }
            if let Some(extra) = &sample.extra_label {
                self.check_label_name(&extra.name)?;
            }
        }
        Ok(())
    }

    fn check_label_name(&self, label: &str) -> Result<()> {
        if is_valid_label_name(label) {
            Ok(())
        } else {
            Err(CoreError::InvalidLabelName {
                metric: self.name.clone(),
                label: label.to_string(),
            })
        }
    }
}

impl Metric for SnapshotMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn help(&self) -> &str {
        &self.help
    }

    fn metric_type(&self) -> MetricType {
        self.metric_type
    }

    fn label_names(&self) -> &[String] {
        &self.label_names
    }

    fn samples(&self) -> Box<dyn Iterator<Item = Sample<'_>> + '_> {
        Box::new(self.samples.iter().map(move |s| {
            let name = s.name.as_deref().unwrap_or(&self.name);
            let sample = Sample::new(name, &s.label_values, s.value);
            match &s.extra_label {
                Some(extra) => sample.with_extra_label(&extra.name, extra.value.as_str()),
                None => sample,
            }
        }))
    }
}

impl SnapshotSample {
    pub fn new<I, S>(label_values: I, value: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            label_values: label_values.into_iter().map(Into::into).collect(),
            extra_label: None,
            value,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_extra_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_label = Some(SnapshotExtraLabel {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

impl SnapshotFile {
    /// Read a snapshot from disk. JSON is accepted as a subset of YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let snapshot = Self::from_yaml_str(&raw)?;
        tracing::debug!(
            path = %path.display(),
            metrics = snapshot.metrics.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Validate every metric and turn the snapshot into a collector.
    pub fn into_collector(self) -> Result<SnapshotCollector> {
        for label in self.static_labels.keys() {
            if !is_valid_label_name(label) {
                return Err(CoreError::InvalidLabelName {
                    metric: "<static>".into(),
                    label: label.clone(),
                });
            }
        }
        let mut collector = SnapshotCollector::new(self.static_labels);
        for metric in self.metrics {
            metric.validate()?;
            collector.register(Arc::new(metric));
        }
        Ok(collector)
    }
}

/// Label values given as YAML scalars. Strings are kept verbatim; numbers
/// and booleans use their Rust `Display` text, so quote a value whose exact
/// spelling matters (`"1e-07"` rather than `1e-07`).
mod scalar_text {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Uint(u64),
        Float(f64),
        Bool(bool),
    }

    impl From<Raw> for String {
        fn from(raw: Raw) -> Self {
            match raw {
                Raw::Text(s) => s,
                Raw::Int(v) => v.to_string(),
                Raw::Uint(v) => v.to_string(),
                Raw::Float(v) => v.to_string(),
                Raw::Bool(v) => v.to_string(),
            }
        }
    }

    pub fn one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Raw::deserialize(deserializer)?.into())
    }

    pub fn many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(Vec::<Raw>::deserialize(deserializer)?
            .into_iter()
            .map(String::from)
            .collect())
    }
}

/// Sample values: plain numbers, or the strings `+Inf`, `-Inf`, `NaN`.
mod sample_value {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(v),
            Raw::Text(s) => parse(&s)
                .ok_or_else(|| D::Error::custom(format!("invalid sample value: {s:?}"))),
        }
    }

    pub(super) fn parse(s: &str) -> Option<f64> {
        match s.trim() {
            "+Inf" | "Inf" | "+inf" | "inf" => Some(f64::INFINITY),
            "-Inf" | "-inf" => Some(f64::NEG_INFINITY),
            "NaN" | "nan" => Some(f64::NAN),
            other => other.parse().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_counter() -> SnapshotMetric {
        SnapshotMetric::new("http_requests_total", "Total HTTP requests", MetricType::Counter)
            .with_label_names(["method"])
            .with_sample(SnapshotSample::new(["GET"], 42.0))
    }

    // ── Validation ───────────────────────────────────────────────

    #[test]
    fn valid_metric_passes() {
        request_counter().validate().unwrap();
    }

    #[test]
    fn bad_metric_name_rejected() {
        let metric = SnapshotMetric::new("http-requests", "", MetricType::Counter);
        assert!(matches!(
            metric.validate(),
            Err(CoreError::InvalidMetricName(name)) if name == "http-requests"
        ));
    }

    #[test]
    fn bad_label_name_rejected() {
        let metric = request_counter().with_label_names(["http:method"]);
        assert!(matches!(
            metric.validate(),
            Err(CoreError::InvalidLabelName { label, .. }) if label == "http:method"
        ));
    }

    #[test]
    fn arity_mismatch_rejected() {
        let metric = request_counter().with_sample(SnapshotSample::new(["GET", "200"], 1.0));
        assert!(matches!(
            metric.validate(),
            Err(CoreError::LabelArity { expected: 1, actual: 2, .. })
        ));
    }

    #[test]
    fn bad_extra_label_rejected() {
        let metric = SnapshotMetric::new("lat", "", MetricType::Histogram).with_sample(
            SnapshotSample::new(Vec::<String>::new(), 1.0).with_extra_label("l e", "0.5"),
        );
        assert!(matches!(metric.validate(), Err(CoreError::InvalidLabelName { .. })));
    }

    // ── Metric impl ──────────────────────────────────────────────

    #[test]
    fn samples_default_to_metric_name() {
        let metric = request_counter();
        let samples: Vec<Sample<'_>> = metric.samples().collect();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].name, "http_requests_total");
        assert_eq!(samples[0].label_values, &["GET".to_string()][..]);
        assert_eq!(samples[0].value, 42.0);
        assert!(samples[0].extra_label.is_none());
    }

    #[test]
    fn named_sample_with_extra_label() {
        let metric = SnapshotMetric::new("lat_seconds", "", MetricType::Histogram).with_sample(
            SnapshotSample::new(Vec::<String>::new(), 7.0)
                .named("lat_seconds_bucket")
                .with_extra_label("le", "+Inf"),
        );
        let sample = metric.samples().next().unwrap();
        assert_eq!(sample.name, "lat_seconds_bucket");
        let extra = sample.extra_label.unwrap();
        assert_eq!(extra.name, "le");
        assert_eq!(extra.value, "+Inf");
    }

    // ── Deserialization ──────────────────────────────────────────

    #[test]
    fn sample_value_strings() {
        assert_eq!(sample_value::parse("+Inf"), Some(f64::INFINITY));
        assert_eq!(sample_value::parse("-Inf"), Some(f64::NEG_INFINITY));
        assert!(sample_value::parse("NaN").unwrap().is_nan());
        assert_eq!(sample_value::parse("1.5"), Some(1.5));
        assert_eq!(sample_value::parse("many"), None);
    }

    #[test]
    fn yaml_snapshot_parses() {
        let yaml = r#"
static_labels:
  instance: host1
metrics:
  - name: http_requests_total
    help: Total HTTP requests
    type: counter
    label_names: [method]
    samples:
      - label_values: [GET]
        value: 42
  - name: queue_depth
    type: gauge
    samples:
      - value: "+Inf"
"#;
        let snapshot = SnapshotFile::from_yaml_str(yaml).unwrap();
        assert_eq!(snapshot.static_labels.get("instance").unwrap(), "host1");
        assert_eq!(snapshot.metrics.len(), 2);
        assert_eq!(snapshot.metrics[0].metric_type, MetricType::Counter);
        assert_eq!(snapshot.metrics[0].samples[0].value, 42.0);
        assert_eq!(snapshot.metrics[1].help, "");
        assert_eq!(snapshot.metrics[1].samples[0].value, f64::INFINITY);
    }

    #[test]
    fn unquoted_scalar_label_values_parse() {
        let yaml = r#"
metrics:
  - name: request_duration_seconds
    type: histogram
    label_names: [status, cached]
    samples:
      - name: request_duration_seconds_bucket
        label_values: [200, false]
        extra_label: { name: le, value: 0.5 }
        value: 3
      - name: request_duration_seconds_bucket
        label_values: ["200", "false"]
        extra_label: { name: le, value: 1 }
        value: 4
"#;
        let snapshot = SnapshotFile::from_yaml_str(yaml).unwrap();
        let samples = &snapshot.metrics[0].samples;
        assert_eq!(samples[0].label_values, vec!["200", "false"]);
        assert_eq!(samples[0].extra_label.as_ref().unwrap().value, "0.5");
        assert_eq!(samples[1].label_values, vec!["200", "false"]);
        assert_eq!(samples[1].extra_label.as_ref().unwrap().value, "1");
    }

    #[test]
    fn unknown_value_string_is_an_error() {
        let yaml = "metrics:\n  - name: m\n    samples:\n      - value: lots\n";
        assert!(matches!(SnapshotFile::from_yaml_str(yaml), Err(CoreError::Yaml(_))));
    }

    #[test]
    fn into_collector_rejects_bad_static_label() {
        let snapshot = SnapshotFile {
            static_labels: StaticLabels::from([("bad-name".to_string(), "x".to_string())]),
            metrics: Vec::new(),
        };
        assert!(matches!(
            snapshot.into_collector(),
            Err(CoreError::InvalidLabelName { .. })
        ));
    }
}
