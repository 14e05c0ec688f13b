pub mod analyzer;
pub mod indexer;
pub mod writer;

use std::path::PathBuf;

use thiserror::Error;

pub use analyzer::{Analyzer, CaseSensitiveAnalyzer};
pub use indexer::{plan_targets, IndexOptions, Indexer};
pub use writer::{DirectoryIndexWriter, IndexManifest, IndexWriter, ManifestDocumentEntry};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Cannot save index to {0}: directory exists, delete it first or force overwrite")]
    DestinationExists(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Duplicate document ID: {0}")]
    DuplicateDocumentId(String),
    #[error("Filename collision detected for hash fragment: {0}")]
    FilenameCollision(String),
}
