pub mod collector;
pub mod config;
pub mod error;
pub mod metric;
pub mod names;
pub mod snapshot;

pub use collector::{MetricCollector, SnapshotCollector};
pub use config::ExporterConfig;
pub use error::{CoreError, Result};
pub use metric::{ExtraLabel, Metric, MetricType, Sample, StaticLabels};
pub use snapshot::{SnapshotFile, SnapshotMetric, SnapshotSample};
