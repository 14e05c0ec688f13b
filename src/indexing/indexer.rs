use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::analyzer::CaseSensitiveAnalyzer;
use super::writer::{DirectoryIndexWriter, IndexManifest, IndexWriter};
use super::IndexError;
use crate::diagnostics::{Diagnostic, DiagnosticSink, LogSink};
use crate::document::Document;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexOptions {
    /// One index per immediate subdirectory of the corpus root.
    pub recursive: bool,
    /// Delete an existing index directory instead of refusing.
    pub force_overwrite: bool,
}

/// Index directory -> corpus directory to fill it from.
///
/// Recursive mode maps every subdirectory `S` of `corpus_root` to
/// `<index_root>_<S>`; otherwise the whole corpus goes to `index_root`.
pub fn plan_targets(
    corpus_root: &Path,
    index_root: &Path,
    recursive: bool,
) -> Result<BTreeMap<PathBuf, PathBuf>, IndexError> {
    let mut targets = BTreeMap::new();
    if !recursive {
        targets.insert(index_root.to_path_buf(), corpus_root.to_path_buf());
        return Ok(targets);
    }

    for entry in fs::read_dir(corpus_root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let mut index_dir = index_root.as_os_str().to_os_string();
        index_dir.push("_");
        index_dir.push(&name);
        targets.insert(PathBuf::from(index_dir), entry.path());
    }
    Ok(targets)
}

/// Walks corpus directories and hands every readable file to an [`IndexWriter`].
pub struct Indexer<D = LogSink> {
    diagnostics: D,
}

impl Default for Indexer<LogSink> {
    fn default() -> Self {
        Self {
            diagnostics: LogSink,
        }
    }
}

impl<D: DiagnosticSink> Indexer<D> {
    pub fn new(diagnostics: D) -> Self {
        Self { diagnostics }
    }

    /// Submit every readable file under `root`, recursively. Returns how many
    /// documents were submitted.
    ///
    /// Unreadable entries are skipped with a diagnostic. Writer failures stop
    /// the walk.
    pub fn index_dir<W: IndexWriter>(&self, writer: &mut W, root: &Path) -> Result<usize, IndexError> {
        let mut added = 0;
        self.visit(writer, root, root, &mut added)?;
        Ok(added)
    }

    fn visit<W: IndexWriter>(
        &self,
        writer: &mut W,
        root: &Path,
        path: &Path,
        added: &mut usize,
    ) -> Result<(), IndexError> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) => {
                self.skip(path, e.to_string());
                return Ok(());
            }
        };

        if metadata.is_dir() {
            let entries = match fs::read_dir(path) {
                Ok(entries) => entries,
                Err(e) => {
                    self.skip(path, e.to_string());
                    return Ok(());
                }
            };
            let mut children = Vec::new();
            for entry in entries {
                match entry {
                    Ok(entry) => children.push(entry.path()),
                    Err(e) => self.skip(path, format!("unreadable directory entry: {e}")),
                }
            }
            // Sorted so repeated runs visit files in the same order.
            children.sort();
            for child in children {
                self.visit(writer, root, &child, added)?;
            }
            return Ok(());
        }

        if !metadata.is_file() {
            self.skip(path, "not a regular file".to_string());
            return Ok(());
        }

        log::info!("adding {}", path.display());
        match Document::read(root, path) {
            Ok(document) => {
                writer.add_document(document)?;
                *added += 1;
            }
            Err(e) => self.skip(path, e.to_string()),
        }
        Ok(())
    }

    fn skip(&self, path: &Path, reason: String) {
        self.diagnostics.emit(Diagnostic::SkippedFile {
            path: path.to_path_buf(),
            reason,
        });
    }

    /// Plan targets for `corpus_root` and index them all.
    pub fn index_corpus(
        &self,
        corpus_root: &Path,
        index_root: &Path,
        options: IndexOptions,
    ) -> Result<BTreeMap<PathBuf, Result<IndexManifest, IndexError>>, IndexError> {
        let targets = plan_targets(corpus_root, index_root, options.recursive)?;
        Ok(self.index_all(&targets, options))
    }

    /// Build one index directory per target.
    ///
    /// Each target succeeds or fails on its own; an existing index directory
    /// fails that target unless `force_overwrite` is set.
    pub fn index_all(
        &self,
        targets: &BTreeMap<PathBuf, PathBuf>,
        options: IndexOptions,
    ) -> BTreeMap<PathBuf, Result<IndexManifest, IndexError>> {
        targets
            .iter()
            .map(|(index_dir, corpus_dir)| {
                let result = self.index_target(index_dir, corpus_dir, options.force_overwrite);
                if let Err(e) = &result {
                    log::error!("indexing {} failed: {e}", index_dir.display());
                }
                (index_dir.clone(), result)
            })
            .collect()
    }

    fn index_target(
        &self,
        index_dir: &Path,
        corpus_dir: &Path,
        force_overwrite: bool,
    ) -> Result<IndexManifest, IndexError> {
        log::info!("start indexing {}", corpus_dir.display());
        if index_dir.exists() {
            if !force_overwrite {
                return Err(IndexError::DestinationExists(index_dir.to_path_buf()));
            }
            log::info!("Removing dir {}", index_dir.display());
            fs::remove_dir_all(index_dir)?;
        }

        let start = Instant::now();
        let mut writer = DirectoryIndexWriter::create(index_dir, CaseSensitiveAnalyzer)?;
        log::info!("Indexing to directory '{}'...", index_dir.display());
        if let Err(e) = self.index_dir(&mut writer, corpus_dir) {
            writer.abort();
            return Err(e);
        }
        let manifest = writer.commit()?;
        log::info!(
            "{} document(s), {} total milliseconds",
            manifest.document_count,
            start.elapsed().as_millis()
        );
        Ok(manifest)
    }
}
