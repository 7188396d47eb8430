use crate::error::Result;
use crate::metric::StaticLabels;
use figment::{Figment, providers::{Env, Format, Yaml}};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for a promtext export run.
///
/// The exporter itself reads no configuration; these values are consumed by
/// whatever drives it (the `promtext` binary).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Labels attached to every exported sample.
    #[serde(default)]
    pub static_labels: StaticLabels,
    /// Snapshot file supplying the metrics.
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
    /// Destination file. stdout when unset.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl ExporterConfig {
    /// Load configuration from YAML file + env overrides.
    ///
    /// `PROMTEXT_SNAPSHOT=/tmp/s.yaml` or `PROMTEXT_STATIC_LABELS__REGION=eu`.
    pub fn load(path: &Path) -> Result<Self> {
        let config: ExporterConfig = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("PROMTEXT_").split("__"))
            .extract()?;
        Ok(config)
    }

    /// Merge `name=value` overrides on top of the configured static labels.
    pub fn with_label_overrides<'a, I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in overrides {
            self.static_labels.insert(name.to_string(), value.to_string());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // ── Default values ────────────────────────────────────────────

    #[test]
    fn default_config_is_empty() {
        let cfg = ExporterConfig::default();
        assert!(cfg.static_labels.is_empty());
        assert!(cfg.snapshot.is_none());
        assert!(cfg.output.is_none());
    }

    // ── ExporterConfig::load() ────────────────────────────────────

    #[test]
    fn load_from_valid_yaml() {
        let yaml = r#"
static_labels:
  instance: host1
  region: eu-west-1
snapshot: /var/lib/promtext/snapshot.yaml
"#;
        let mut tmpfile = tempfile::NamedTempFile::new().unwrap();
        write!(tmpfile, "{yaml}").unwrap();
        let cfg = ExporterConfig::load(tmpfile.path()).unwrap();
        assert_eq!(cfg.static_labels.get("instance").unwrap(), "host1");
        assert_eq!(cfg.static_labels.get("region").unwrap(), "eu-west-1");
        assert_eq!(
            cfg.snapshot.as_deref(),
            Some(Path::new("/var/lib/promtext/snapshot.yaml"))
        );
        assert!(cfg.output.is_none());
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        // Figment treats a missing YAML file as an empty provider.
        let cfg = ExporterConfig::load(Path::new("/nonexistent/promtext.yaml")).unwrap();
        assert!(cfg.snapshot.is_none());
    }

    #[test]
    fn load_rejects_wrong_shape() {
        let mut tmpfile = tempfile::NamedTempFile::new().unwrap();
        write!(tmpfile, "static_labels: [a, b]\n").unwrap();
        assert!(ExporterConfig::load(tmpfile.path()).is_err());
    }

    // ── Overrides ─────────────────────────────────────────────────

    #[test]
    fn label_overrides_replace_and_extend() {
        let mut cfg = ExporterConfig::default();
        cfg.static_labels.insert("instance".into(), "host1".into());
        let cfg = cfg.with_label_overrides([("instance", "host2"), ("job", "api")]);
        assert_eq!(cfg.static_labels.get("instance").unwrap(), "host2");
        assert_eq!(cfg.static_labels.get("job").unwrap(), "api");
        assert_eq!(cfg.static_labels.len(), 2);
    }
}
