pub mod error;
pub mod escape;
pub mod go_float;
pub mod header_cache;
pub mod text_formatter;

pub use error::ExportError;
pub use text_formatter::{CONTENT_TYPE_004, CollectorExporter, TextFormatter, TextRenderer};
