use thiserror::Error;

/// Unified error type for promtext-core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid metric name: {0:?}")]
    InvalidMetricName(String),

    #[error("Invalid label name {label:?} on metric {metric}")]
    InvalidLabelName { metric: String, label: String },

    #[error("Metric {metric} declares {expected} label names but a sample carries {actual} values")]
    LabelArity {
        metric: String,
        expected: usize,
        actual: usize,
    },

    #[error("Config error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<figment::Error> for CoreError {
    fn from(e: figment::Error) -> Self {
        CoreError::Config(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
