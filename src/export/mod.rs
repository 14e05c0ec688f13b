pub mod arff;
pub mod summary;

use std::path::PathBuf;

use thiserror::Error;

pub use arff::{export, quote, read_arff, write_arff, ArffData};
pub use summary::{AttributeSummary, ExportSummary};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Cannot write training set to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid ARFF at line {line_number}: {message}")]
    Parse { line_number: usize, message: String },
}
