use thiserror::Error;

/// Failure while writing an exposition to its sink.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed writing exposition: {0}")]
    Write(#[from] std::io::Error),
}
