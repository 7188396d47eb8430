use crate::metric::{Metric, StaticLabels};
use std::sync::Arc;

/// Source of metrics for one export: the static labels plus the ordered
/// descriptors. Output order follows [`MetricCollector::metrics`].
pub trait MetricCollector: Send + Sync {
    fn static_labels(&self) -> &StaticLabels;

    fn metrics(&self) -> Box<dyn Iterator<Item = &Arc<dyn Metric>> + '_>;
}

impl<C: MetricCollector + ?Sized> MetricCollector for Arc<C> {
    fn static_labels(&self) -> &StaticLabels {
        (**self).static_labels()
    }

    fn metrics(&self) -> Box<dyn Iterator<Item = &Arc<dyn Metric>> + '_> {
        (**self).metrics()
    }
}

/// Fixed, ordered set of descriptors.
///
/// Built once (from a snapshot file or by hand) and read by every export.
#[derive(Clone, Default)]
pub struct SnapshotCollector {
    static_labels: StaticLabels,
    metrics: Vec<Arc<dyn Metric>>,
}

impl SnapshotCollector {
    pub fn new(static_labels: StaticLabels) -> Self {
        Self {
            static_labels,
            metrics: Vec::new(),
        }
    }

    /// Append a descriptor; it is exported after all earlier ones.
    pub fn register(&mut self, metric: Arc<dyn Metric>) {
        tracing::debug!(metric = metric.name(), "Registered metric");
        self.metrics.push(metric);
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl MetricCollector for SnapshotCollector {
    fn static_labels(&self) -> &StaticLabels {
        &self.static_labels
    }

    fn metrics(&self) -> Box<dyn Iterator<Item = &Arc<dyn Metric>> + '_> {
        Box::new(self.metrics.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::MetricType;
    use crate::snapshot::SnapshotMetric;

    #[test]
    fn register_preserves_order() {
        let mut collector = SnapshotCollector::default();
        collector.register(Arc::new(SnapshotMetric::new("b_total", "", MetricType::Counter)));
        collector.register(Arc::new(SnapshotMetric::new("a_total", "", MetricType::Counter)));

        let names: Vec<&str> = collector.metrics().map(|m| m.name()).collect();
        assert_eq!(names, vec!["b_total", "a_total"]);
        assert_eq!(collector.len(), 2);
        assert!(!collector.is_empty());
    }

    #[test]
    fn arc_collector_delegates() {
        let labels = StaticLabels::from([("instance".to_string(), "host1".to_string())]);
        let collector = Arc::new(SnapshotCollector::new(labels));
        assert_eq!(
            MetricCollector::static_labels(&collector).get("instance").unwrap(),
            "host1"
        );
        assert_eq!(MetricCollector::metrics(&collector).count(), 0);
    }
}
