use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Process-wide labels attached to every sample of one export.
///
/// A `BTreeMap` keeps the rendered order stable (sorted by label name).
pub type StaticLabels = BTreeMap<String, String>;

/// The five metric kinds of the 0.0.4 text format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    Counter,
    Gauge,
    Histogram,
    Summary,
    #[default]
    Untyped,
}

impl MetricType {
    /// Name used on the `# TYPE` line.
    pub fn name(self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
            MetricType::Histogram => "histogram",
            MetricType::Summary => "summary",
            MetricType::Untyped => "untyped",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A label outside the descriptor's fixed schema, e.g. a histogram's `le`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraLabel<'a> {
    pub name: &'a str,
    pub value: Cow<'a, str>,
}

/// One data point of a metric, borrowed from its descriptor for the
/// duration of a single render.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<'a> {
    /// Emitted name; may carry a suffix such as `_sum` or `_bucket`.
    pub name: Cow<'a, str>,
    /// Positionally aligned with [`Metric::label_names`].
    pub label_values: &'a [String],
    pub extra_label: Option<ExtraLabel<'a>>,
    pub value: f64,
}

impl<'a> Sample<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, label_values: &'a [String], value: f64) -> Self {
        Self {
            name: name.into(),
            label_values,
            extra_label: None,
            value,
        }
    }

    pub fn with_extra_label(mut self, name: &'a str, value: impl Into<Cow<'a, str>>) -> Self {
        self.extra_label = Some(ExtraLabel {
            name,
            value: value.into(),
        });
        self
    }
}

/// A metric descriptor as seen by an exporter.
///
/// Descriptors are shared as `Arc<dyn Metric>` and identified by that
/// allocation: exporters may cache derived data (the `HELP`/`TYPE` header)
/// for as long as the same `Arc` is presented. A source that changes a
/// descriptor's name, help or type must hand out a new `Arc`.
pub trait Metric: Send + Sync {
    fn name(&self) -> &str;

    fn help(&self) -> &str;

    fn metric_type(&self) -> MetricType;

    /// Fixed label schema shared by every sample of this metric.
    fn label_names(&self) -> &[String];

    /// Current samples, produced lazily. May be empty.
    fn samples(&self) -> Box<dyn Iterator<Item = Sample<'_>> + '_>;
}
