use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::metadata::Metadata;
use crate::types::identifiers::{DocumentId, DocumentIdError, DocumentVersion};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Content must be valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Id(#[from] DocumentIdError),
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A text file submitted to the indexer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub version: DocumentVersion,
    pub source: String,
    pub content: String,
    pub metadata: Metadata,
}

impl Document {
    /// Build a Document from raw bytes, computing its content version.
    pub fn ingest(
        id: DocumentId,
        source: String,
        raw_content: Vec<u8>,
        metadata: Metadata,
    ) -> Result<Self, DocumentError> {
        let content = String::from_utf8(raw_content)?;
        let version = DocumentVersion::from_content(content.as_bytes());

        Ok(Document {
            id,
            version,
            source,
            content,
            metadata,
        })
    }

    /// Read `path` (somewhere under `root`) from disk.
    pub fn read(root: &Path, path: &Path) -> Result<Self, DocumentError> {
        let id = DocumentId::from_path(root, path)?;
        let raw = std::fs::read(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut metadata = Metadata::new();
        metadata.insert_number("byte_size", raw.len() as i64);

        Self::ingest(id, path.display().to_string(), raw, metadata)
    }
}
