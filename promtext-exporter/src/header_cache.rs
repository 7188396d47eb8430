use crate::escape::escape_help;
use dashmap::DashMap;
use promtext_core::Metric;
use std::sync::Arc;
use tracing::debug;

/// Memoized `# HELP` / `# TYPE` preamble per metric descriptor.
///
/// Keyed by the descriptor's `Arc` allocation address. The entry keeps the
/// `Arc` alive, so an address cannot be reused by a different descriptor
/// while its header is cached. Entries are never invalidated; a source that
/// changes a descriptor's name, help or type hands out a new `Arc`.
#[derive(Default)]
pub struct HeaderCache {
    headers: DashMap<usize, CachedHeader>,
}

struct CachedHeader {
    _metric: Arc<dyn Metric>,
    header: Arc<str>,
}

impl HeaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached header, building and inserting it when absent.
    ///
    /// The returned `Arc<str>` is detached from the map, so no shard lock is
    /// held while the caller writes it out.
    pub fn get_or_build(&self, metric: &Arc<dyn Metric>) -> Arc<str> {
        let key = identity(metric);
        if let Some(entry) = self.headers.get(&key) {
            return Arc::clone(&entry.header);
        }

        let entry = self.headers.entry(key).or_insert_with(|| {
            debug!(metric = metric.name(), "Header cache miss");
            CachedHeader {
                _metric: Arc::clone(metric),
                header: build_header(&**metric).into(),
            }
        });
        Arc::clone(&entry.header)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

fn identity(metric: &Arc<dyn Metric>) -> usize {
    Arc::as_ptr(metric) as *const () as usize
}

/// `# HELP <name> <escaped help>\n# TYPE <name> <type>\n`
pub fn build_header(metric: &dyn Metric) -> String {
    let name = metric.name();
    let help = escape_help(metric.help());
    let type_name = metric.metric_type().name();

    let mut header = String::with_capacity(2 * name.len() + help.len() + type_name.len() + 16);
    header.push_str("# HELP ");
    header.push_str(name);
    header.push(' ');
    header.push_str(&help);
    header.push_str("\n# TYPE ");
    header.push_str(name);
    header.push(' ');
    header.push_str(type_name);
    header.push('\n');
    header
}
