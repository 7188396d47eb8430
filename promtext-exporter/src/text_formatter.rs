use crate::error::ExportError;
use crate::escape::escape_label_value;
use crate::go_float::append_go_float;
use crate::header_cache::HeaderCache;
use promtext_core::{Metric, MetricCollector, Sample, StaticLabels};
use std::io::{self, BufWriter, Write};
use std::sync::Arc;
use tracing::{debug, trace};

/// Content type of the 0.0.4 text format, for whoever serves the output.
pub const CONTENT_TYPE_004: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Something that can write a complete exposition of its metrics.
pub trait CollectorExporter {
    fn export_to(&self, sink: &mut dyn Write) -> Result<(), ExportError>;
}

/// Renders descriptors into the text format, caching each header.
///
/// Safe to share across threads; concurrent renders only contend on the
/// header cache, and never while writing.
#[derive(Default)]
pub struct TextRenderer {
    headers: HeaderCache,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write every metric, in iteration order, then flush `sink`.
    ///
    /// The first write error aborts the render; whatever was already written
    /// stays in the sink, and buffered bytes not yet written are dropped
    /// rather than retried.
    pub fn render<'m, I, W>(
        &self,
        metrics: I,
        static_labels: &StaticLabels,
        sink: W,
    ) -> Result<(), ExportError>
    where
        I: IntoIterator<Item = &'m Arc<dyn Metric>>,
        W: Write,
    {
        let mut out = BufWriter::new(sink);
        let written = self
            .write_document(&mut out, metrics, static_labels)
            .and_then(|counts| out.flush().map(|()| counts));

        match written {
            Ok((metric_count, sample_count)) => {
                debug!(metrics = metric_count, samples = sample_count, "Rendered exposition");
                Ok(())
            }
            Err(e) => {
                // Discard the unwritten buffer; dropping the BufWriter would
                // write it to the sink again.
                let (_sink, _unwritten) = out.into_parts();
                debug!(error = %e, "Render aborted");
                Err(e.into())
            }
        }
    }

    /// Returns the number of metrics and samples written.
    fn write_document<'m, I, W>(
        &self,
        out: &mut W,
        metrics: I,
        static_labels: &StaticLabels,
    ) -> io::Result<(usize, usize)>
    where
        I: IntoIterator<Item = &'m Arc<dyn Metric>>,
        W: Write,
    {
        let mut line = String::with_capacity(32);
        let mut metric_count = 0usize;
        let mut sample_count = 0usize;

        for metric in metrics {
            let header = self.headers.get_or_build(metric);
            out.write_all(header.as_bytes())?;

            let label_names = metric.label_names();
            for sample in metric.samples() {
                write_sample(out, &sample, static_labels, label_names, &mut line)?;
                sample_count += 1;
            }
            trace!(metric = metric.name(), "Rendered metric");
            metric_count += 1;
        }
        Ok((metric_count, sample_count))
    }

    /// Render into a `String`.
    pub fn render_to_string<'m, I>(&self, metrics: I, static_labels: &StaticLabels) -> String
    where
        I: IntoIterator<Item = &'m Arc<dyn Metric>>,
    {
        let mut buffer = Vec::new();
        // A Vec sink cannot fail.
        self.render(metrics, static_labels, &mut buffer).unwrap_or(());
        String::from_utf8(buffer).unwrap_or_default()
    }

    /// Number of descriptors whose header is cached.
    pub fn cached_headers(&self) -> usize {
        self.headers.len()
    }
}

/// `name[{labels}] value\n`
fn write_sample<W: Write>(
    out: &mut W,
    sample: &Sample<'_>,
    static_labels: &StaticLabels,
    label_names: &[String],
    line: &mut String,
) -> io::Result<()> {
    out.write_all(sample.name.as_bytes())?;

    // A bare name is required when there is nothing to put in the braces.
    if !static_labels.is_empty() || !label_names.is_empty() || sample.extra_label.is_some() {
        out.write_all(b"{")?;
        for (name, value) in static_labels {
            write_label(out, name, value)?;
        }
        for (i, name) in label_names.iter().enumerate() {
            write_label(out, name, &sample.label_values[i])?;
        }
        if let Some(extra) = &sample.extra_label {
            write_label(out, extra.name, &extra.value)?;
        }
        out.write_all(b"}")?;
    }

    line.clear();
    line.push(' ');
    append_go_float(line, sample.value);
    line.push('\n');
    out.write_all(line.as_bytes())
}

/// `name="value",` — the trailing comma is emitted after every label.
fn write_label<W: Write>(out: &mut W, name: &str, value: &str) -> io::Result<()> {
    out.write_all(name.as_bytes())?;
    out.write_all(b"=\"")?;
    out.write_all(escape_label_value(value).as_bytes())?;
    out.write_all(b"\",")
}

/// Exporter bound to a [`MetricCollector`].
pub struct TextFormatter<C> {
    collector: C,
    renderer: TextRenderer,
}

impl<C: MetricCollector> TextFormatter<C> {
    pub fn new(collector: C) -> Self {
        Self {
            collector,
            renderer: TextRenderer::new(),
        }
    }

    pub fn collector(&self) -> &C {
        &self.collector
    }

    pub fn renderer(&self) -> &TextRenderer {
        &self.renderer
    }

    pub fn export_to_string(&self) -> String {
        self.renderer
            .render_to_string(self.collector.metrics(), self.collector.static_labels())
    }
}

impl<C: MetricCollector> CollectorExporter for TextFormatter<C> {
    fn export_to(&self, sink: &mut dyn Write) -> Result<(), ExportError> {
        self.renderer
            .render(self.collector.metrics(), self.collector.static_labels(), sink)
    }
}
