// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  promtext — render a metrics snapshot as Prometheus text 0.0.4
//
//  Input:   YAML/JSON snapshot (static labels + metrics + samples)
//  Config:  optional YAML file with PROMTEXT_ env overrides
//  Output:  stdout or a file
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use anyhow::{Context, bail};
use clap::Parser;
use promtext_core::{ExporterConfig, SnapshotFile};
use promtext_exporter::{CONTENT_TYPE_004, CollectorExporter, TextFormatter};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "promtext", version, about = "Render a metrics snapshot as Prometheus text")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "promtext.yaml")]
    config: PathBuf,

    /// Snapshot file to render (overrides the config)
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Write the exposition here instead of stdout (overrides the config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extra static label, `name=value`; may be repeated
    #[arg(short, long = "label", value_parser = parse_label)]
    labels: Vec<(String, String)>,

    /// Print the exposition content type and exit
    #[arg(long)]
    content_type: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Tracing ──
    // Logs go to stderr; stdout may carry the exposition.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.content_type {
        println!("{CONTENT_TYPE_004}");
        return Ok(());
    }

    run(cli)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // ── Config ──
    let config = if cli.config.exists() {
        info!(path = %cli.config.display(), "Loading config file");
        ExporterConfig::load(&cli.config)
            .with_context(|| format!("loading config {}", cli.config.display()))?
    } else {
        ExporterConfig::default()
    };
    let config = config.with_label_overrides(
        cli.labels.iter().map(|(name, value)| (name.as_str(), value.as_str())),
    );

    // ── Snapshot ──
    let Some(snapshot_path) = cli.snapshot.or(config.snapshot) else {
        bail!("no snapshot given: pass --snapshot or set `snapshot` in the config");
    };
    let mut snapshot = SnapshotFile::load(&snapshot_path)
        .with_context(|| format!("reading snapshot {}", snapshot_path.display()))?;
    // Configured labels win over the snapshot's own.
    snapshot.static_labels.extend(config.static_labels);
    let collector = snapshot
        .into_collector()
        .with_context(|| format!("validating snapshot {}", snapshot_path.display()))?;
    info!(metrics = collector.len(), "Snapshot loaded");

    // ── Export ──
    let formatter = TextFormatter::new(collector);
    match cli.output.or(config.output) {
        Some(path) => {
            let mut file = File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            formatter.export_to(&mut file)?;
            info!(path = %path.display(), "Exposition written");
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            formatter.export_to(&mut lock)?;
            lock.flush()?;
        }
    }
    Ok(())
}

fn parse_label(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got {raw:?}")),
    }
}
