use regex::Regex;
use std::sync::LazyLock;

static METRIC_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_:][a-zA-Z0-9_:]*$").expect("static regex"));

static LABEL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("static regex"));

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
pub fn is_valid_metric_name(name: &str) -> bool {
    METRIC_NAME.is_match(name)
}

/// `[a-zA-Z_][a-zA-Z0-9_]*` — colons are reserved for metric names.
pub fn is_valid_label_name(name: &str) -> bool {
    LABEL_NAME.is_match(name)
}
