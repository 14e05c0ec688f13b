use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::analyzer::Analyzer;
use super::IndexError;
use crate::document::Document;
use crate::types::identifiers::{DocumentId, DocumentVersion};

/// Accepts documents found by the indexer.
pub trait IndexWriter {
    fn add_document(&mut self, document: Document) -> Result<(), IndexError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDocumentEntry {
    pub id: DocumentId,
    pub version: DocumentVersion,
    pub file: String,
    pub term_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexManifest {
    pub index_version: String,
    pub analyzer: String,
    pub created_at: DateTime<Utc>, // informational only
    pub document_count: usize,
    pub documents: Vec<ManifestDocumentEntry>,
}

/// Writes documents as JSON files plus a manifest into a fresh directory.
///
/// Everything goes to a sibling temp directory first; [`commit`] renames it
/// into place. Single-threaded, one directory per writer.
///
/// [`commit`]: DirectoryIndexWriter::commit
pub struct DirectoryIndexWriter<A> {
    output_dir: PathBuf,
    temp_dir: PathBuf,
    analyzer: A,
    entries: BTreeMap<DocumentId, ManifestDocumentEntry>,
    seen_filenames: BTreeSet<String>,
}

impl<A: Analyzer> DirectoryIndexWriter<A> {
    /// Refuses to touch an existing `output_dir`.
    ///
    /// The temp directory is `<output_dir>.tmp.<run id>`; it is created fresh
    /// and never replaces anything already on disk.
    pub fn create(output_dir: &Path, analyzer: A) -> Result<Self, IndexError> {
        if output_dir.exists() {
            return Err(IndexError::DestinationExists(output_dir.to_path_buf()));
        }

        let temp_dir = temp_dir_for(output_dir);
        if let Some(parent) = temp_dir.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir(&temp_dir).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => IndexError::DestinationExists(temp_dir.clone()),
            _ => IndexError::Io(e),
        })?;
        fs::create_dir(temp_dir.join("documents"))?;

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            temp_dir,
            analyzer,
            entries: BTreeMap::new(),
            seen_filenames: BTreeSet::new(),
        })
    }

    /// Discard everything written so far. `output_dir` is never created.
    pub fn abort(self) {
        if let Err(e) = fs::remove_dir_all(&self.temp_dir) {
            log::warn!("cannot remove {}: {e}", self.temp_dir.display());
        }
    }

    /// Write the manifest and move the index into place.
    pub fn commit(self) -> Result<IndexManifest, IndexError> {
        let mut hasher = Sha256::new();
        hasher.update(self.analyzer.name().as_bytes());
        for entry in self.entries.values() {
            let line = format!("{}:{}", entry.id.as_str(), entry.version.as_str());
            hasher.update(line.as_bytes());
        }

        let documents: Vec<ManifestDocumentEntry> = self.entries.into_values().collect();
        let manifest = IndexManifest {
            index_version: format!("sha256:{}", hex::encode(hasher.finalize())),
            analyzer: self.analyzer.name().to_string(),
            created_at: Utc::now(),
            document_count: documents.len(),
            documents,
        };

        let f = fs::File::create(self.temp_dir.join("manifest.json"))?;
        serde_json::to_writer_pretty(&f, &manifest)?;
        f.sync_all()?;

        fs::rename(&self.temp_dir, &self.output_dir)?;
        Ok(manifest)
    }
}

impl<A: Analyzer> IndexWriter for DirectoryIndexWriter<A> {
    fn add_document(&mut self, mut document: Document) -> Result<(), IndexError> {
        if self.entries.contains_key(&document.id) {
            return Err(IndexError::DuplicateDocumentId(
                document.id.as_str().to_string(),
            ));
        }

        let term_count = self.analyzer.terms(&document.content).len();
        document
            .metadata
            .insert_number("term_count", term_count as i64);
        document
            .metadata
            .insert_string("analyzer", self.analyzer.name());

        // Named by id, not content: identical files may appear under several paths.
        let stem = hex::encode(Sha256::digest(document.id.as_str().as_bytes()))[..12].to_string();
        if !self.seen_filenames.insert(stem.clone()) {
            return Err(IndexError::FilenameCollision(stem));
        }
        let file = format!("documents/{stem}.json");

        let f = fs::File::create(self.temp_dir.join(&file))?;
        serde_json::to_writer(&f, &document)?;
        f.sync_all()?;

        self.entries.insert(
            document.id.clone(),
            ManifestDocumentEntry {
                id: document.id,
                version: document.version,
                file,
                term_count,
            },
        );
        Ok(())
    }
}

/// Sibling of `output_dir` named after this run (path, process, clock), so
/// concurrent or crashed runs never share a temp directory.
fn temp_dir_for(output_dir: &Path) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(output_dir.as_os_str().as_encoded_bytes());
    hasher.update(std::process::id().to_le_bytes());
    hasher.update(Utc::now().to_rfc3339().as_bytes());
    let run_id = hex::encode(hasher.finalize());

    let mut name = output_dir.as_os_str().to_os_string();
    name.push(format!(".tmp.{}", &run_id[..12]));
    PathBuf::from(name)
}
