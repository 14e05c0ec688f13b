//! Context examples and where they come from.
//!
//! The example source is JSON Lines: one object per line with the raw
//! `left` and `right` context strings of a detected span and, optionally,
//! the `document` it was found in. Records missing either context yield no
//! example.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw context around one candidate span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextExample {
    pub left_context: String,
    pub right_context: String,
    pub document: Option<String>,
}

impl ContextExample {
    pub fn new(left_context: impl Into<String>, right_context: impl Into<String>) -> Self {
        Self {
            left_context: left_context.into(),
            right_context: right_context.into(),
            document: None,
        }
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum ExampleSourceError {
    #[error("Cannot read examples from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid example record at line {line_number}: {source}")]
    Parse {
        line_number: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// All examples read from one source, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleSet {
    examples: Vec<ContextExample>,
}

impl ExampleSet {
    pub fn new(examples: Vec<ContextExample>) -> Self {
        Self { examples }
    }

    /// Documents that contributed at least one example.
    pub fn documents(&self) -> BTreeSet<&str> {
        self.examples
            .iter()
            .filter_map(|e| e.document.as_deref())
            .collect()
    }

    pub fn contexts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.examples
            .iter()
            .map(|e| (e.left_context.as_str(), e.right_context.as_str()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContextExample> {
        self.examples.iter()
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

impl<'a> IntoIterator for &'a ExampleSet {
    type Item = &'a ContextExample;
    type IntoIter = std::slice::Iter<'a, ContextExample>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}

pub trait ExampleSource {
    fn read_examples(&self) -> Result<ExampleSet, ExampleSourceError>;
}

#[derive(Debug, Deserialize)]
struct Record {
    left: Option<String>,
    right: Option<String>,
    document: Option<String>,
}

/// Parse JSON Lines example records. Blank lines are skipped.
pub fn parse_json_lines(text: &str) -> Result<ExampleSet, ExampleSourceError> {
    let mut examples = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: Record =
            serde_json::from_str(line).map_err(|source| ExampleSourceError::Parse {
                line_number: i + 1,
                source,
            })?;
        if let (Some(left), Some(right)) = (record.left, record.right) {
            examples.push(ContextExample {
                left_context: left,
                right_context: right,
                document: record.document,
            });
        }
    }
    Ok(ExampleSet::new(examples))
}

/// A JSON Lines file on disk.
#[derive(Debug, Clone)]
pub struct JsonLinesSource {
    path: PathBuf,
}

impl JsonLinesSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExampleSource for JsonLinesSource {
    fn read_examples(&self) -> Result<ExampleSet, ExampleSourceError> {
        let text = fs::read_to_string(&self.path).map_err(|source| ExampleSourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_json_lines(&text)
    }
}
