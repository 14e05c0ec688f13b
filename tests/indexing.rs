use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use studyref_core::diagnostics::{CollectingSink, Diagnostic};
use studyref_core::document::{Document, DocumentId, Metadata, MetadataValue};
use studyref_core::indexing::{
    plan_targets, CaseSensitiveAnalyzer, DirectoryIndexWriter, IndexError, IndexManifest,
    IndexOptions, IndexWriter, Indexer,
};
use tempfile::tempdir;

/// Keeps submitted documents in memory.
#[derive(Default)]
struct MemoryWriter {
    documents: Vec<Document>,
}

impl IndexWriter for MemoryWriter {
    fn add_document(&mut self, document: Document) -> Result<(), IndexError> {
        self.documents.push(document);
        Ok(())
    }
}

fn write(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sibling_names(path: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn corpus(root: &Path) {
    write(&root.join("econ/a.txt"), b"Data from the SOEP panel.");
    write(&root.join("econ/deep/b.txt"), b"ALLBUS 2010 and allbus 2012");
    write(&root.join("soc/c.txt"), b"The General Social Survey");
    write(&root.join("readme.txt"), b"top level");
}

#[test]
fn invariant_walk_submits_regular_files_only() {
    let dir = tempdir().unwrap();
    corpus(dir.path());
    fs::create_dir_all(dir.path().join("empty")).unwrap();

    let sink = CollectingSink::new();
    let mut writer = MemoryWriter::default();
    let added = Indexer::new(&sink).index_dir(&mut writer, dir.path()).unwrap();

    assert_eq!(added, 4);
    let ids: Vec<&str> = writer.documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["econ/a.txt", "econ/deep/b.txt", "readme.txt", "soc/c.txt"]);
    assert!(sink.is_empty());
}

#[test]
fn invariant_unreadable_files_are_skipped() {
    let dir = tempdir().unwrap();
    corpus(dir.path());
    write(&dir.path().join("econ/binary.dat"), &[0xff, 0xfe, 0x00, 0x9f]);

    let sink = CollectingSink::new();
    let mut writer = MemoryWriter::default();
    let added = Indexer::new(&sink).index_dir(&mut writer, dir.path()).unwrap();

    assert_eq!(added, 4);
    match sink.diagnostics().as_slice() {
        [Diagnostic::SkippedFile { path, .. }] => assert!(path.ends_with("econ/binary.dat")),
        other => panic!("expected one skipped file, got {other:?}"),
    }
}

#[test]
fn invariant_missing_root_is_skipped_not_fatal() {
    let dir = tempdir().unwrap();
    let sink = CollectingSink::new();
    let mut writer = MemoryWriter::default();
    let added = Indexer::new(&sink)
        .index_dir(&mut writer, &dir.path().join("gone"))
        .unwrap();
    assert_eq!(added, 0);
    assert_eq!(sink.len(), 1);
}

#[test]
fn directory_writer_records_case_sensitive_term_counts() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("corpus");
    corpus(&root);
    let out = dir.path().join("index");

    let mut writer = DirectoryIndexWriter::create(&out, CaseSensitiveAnalyzer).unwrap();
    Indexer::new(CollectingSink::new())
        .index_dir(&mut writer, &root)
        .unwrap();
    let manifest = writer.commit().unwrap();

    assert_eq!(manifest.document_count, 4);
    assert_eq!(manifest.analyzer, "case-sensitive-standard");
    let b = manifest
        .documents
        .iter()
        .find(|e| e.id.as_str() == "econ/deep/b.txt")
        .unwrap();
    assert_eq!(b.term_count, 5);

    let stored: Document =
        serde_json::from_str(&fs::read_to_string(out.join(&b.file)).unwrap()).unwrap();
    assert_eq!(stored.content, "ALLBUS 2010 and allbus 2012");
    assert_eq!(stored.metadata.number("term_count"), Some(5));
    assert_eq!(
        stored.metadata.get("analyzer"),
        Some(&MetadataValue::String("case-sensitive-standard".into()))
    );
    assert!(out.join("manifest.json").exists());
    assert_eq!(sibling_names(&out), ["corpus", "index"]);
}

#[test]
fn invariant_identical_content_under_two_paths_is_indexed_twice() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("corpus");
    write(&root.join("one.txt"), b"same words");
    write(&root.join("two.txt"), b"same words");

    let mut writer = DirectoryIndexWriter::create(&dir.path().join("idx"), CaseSensitiveAnalyzer).unwrap();
    Indexer::new(CollectingSink::new()).index_dir(&mut writer, &root).unwrap();
    let manifest = writer.commit().unwrap();
    assert_eq!(manifest.document_count, 2);
    assert_eq!(manifest.documents[0].version, manifest.documents[1].version);
}

#[test]
fn invariant_duplicate_id_is_rejected() {
    let dir = tempdir().unwrap();
    let mut writer = DirectoryIndexWriter::create(&dir.path().join("idx"), CaseSensitiveAnalyzer).unwrap();
    let id = DocumentId::from_path(Path::new("/c"), Path::new("/c/a.txt")).unwrap();
    let doc = Document::ingest(id, "a.txt".into(), b"x".to_vec(), Metadata::new()).unwrap();

    writer.add_document(doc.clone()).unwrap();
    assert!(matches!(
        writer.add_document(doc),
        Err(IndexError::DuplicateDocumentId(_))
    ));
}

#[test]
fn invariant_existing_destination_is_refused() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("corpus");
    corpus(&root);
    let out = dir.path().join("index");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("keep.me"), b"precious").unwrap();

    let targets = BTreeMap::from([(out.clone(), root)]);
    let results = Indexer::new(CollectingSink::new()).index_all(&targets, IndexOptions::default());

    assert!(matches!(results[&out], Err(IndexError::DestinationExists(_))));
    assert!(out.join("keep.me").exists());
}

#[test]
fn invariant_force_overwrite_replaces_destination() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("corpus");
    corpus(&root);
    let out = dir.path().join("index");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("stale"), b"old").unwrap();

    let targets = BTreeMap::from([(out.clone(), root)]);
    let options = IndexOptions {
        recursive: false,
        force_overwrite: true,
    };
    let results = Indexer::new(CollectingSink::new()).index_all(&targets, options);

    let manifest: &IndexManifest = results[&out].as_ref().unwrap();
    assert_eq!(manifest.document_count, 4);
    assert!(!out.join("stale").exists());
}

#[test]
fn recursive_plan_maps_each_subdirectory() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("corpus");
    corpus(&root);
    let index_root = dir.path().join("idx");

    let targets = plan_targets(&root, &index_root, true).unwrap();
    let expected: BTreeMap<PathBuf, PathBuf> = BTreeMap::from([
        (dir.path().join("idx_econ"), root.join("econ")),
        (dir.path().join("idx_soc"), root.join("soc")),
    ]);
    assert_eq!(targets, expected);

    let flat = plan_targets(&root, &index_root, false).unwrap();
    assert_eq!(flat, BTreeMap::from([(index_root, root)]));
}

#[test]
fn recursive_corpus_builds_one_index_per_subdirectory() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("corpus");
    corpus(&root);

    let options = IndexOptions {
        recursive: true,
        force_overwrite: false,
    };
    let results = Indexer::new(CollectingSink::new())
        .index_corpus(&root, &dir.path().join("idx"), options)
        .unwrap();

    assert_eq!(results.len(), 2);
    let econ = results[&dir.path().join("idx_econ")].as_ref().unwrap();
    assert_eq!(econ.document_count, 2);
    let ids: Vec<&str> = econ.documents.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["a.txt", "deep/b.txt"]);
}

#[test]
fn invariant_unrelated_tmp_directory_is_left_alone() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("corpus");
    corpus(&root);
    let out = dir.path().join("index");
    write(&dir.path().join("index.tmp/precious.txt"), b"keep");

    let results = Indexer::new(CollectingSink::new())
        .index_corpus(&root, &out, IndexOptions::default())
        .unwrap();

    assert_eq!(results[&out].as_ref().unwrap().document_count, 4);
    assert_eq!(
        fs::read(dir.path().join("index.tmp/precious.txt")).unwrap(),
        b"keep"
    );
    assert_eq!(sibling_names(&out), ["corpus", "index", "index.tmp"]);
}

#[test]
fn invariant_failed_build_leaves_no_temp_directory() {
    struct FailingWriter;

    impl IndexWriter for FailingWriter {
        fn add_document(&mut self, document: Document) -> Result<(), IndexError> {
            Err(IndexError::DuplicateDocumentId(document.id.as_str().to_string()))
        }
    }

    let dir = tempdir().unwrap();
    let root = dir.path().join("corpus");
    corpus(&root);
    let err = Indexer::new(CollectingSink::new())
        .index_dir(&mut FailingWriter, &root)
        .unwrap_err();
    assert!(matches!(err, IndexError::DuplicateDocumentId(_)));

    let mut writer = DirectoryIndexWriter::create(&dir.path().join("idx"), CaseSensitiveAnalyzer).unwrap();
    writer
        .add_document(Document::read(&root, &root.join("readme.txt")).unwrap())
        .unwrap();
    writer.abort();
    assert_eq!(sibling_names(&root), ["corpus"]);
}

