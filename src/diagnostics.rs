//! Diagnostics emitted while processing untrusted-ish inputs.
//!
//! Components take a [`DiagnosticSink`] instead of printing, so callers decide
//! where warnings go. [`LogSink`] forwards to the `log` facade;
//! [`CollectingSink`] keeps everything in memory.

use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A raw context had fewer whitespace tokens than the feature window needs.
    ShortContext { context: String, tokens: usize },
    /// A corpus entry could not be read and was left out of the index.
    SkippedFile { path: PathBuf, reason: String },
    /// One line of the tagger process's error stream.
    TaggerStderr { line: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ShortContext { context, tokens } => {
                write!(f, "ignoring context ({tokens} tokens): {context}")
            }
            Diagnostic::SkippedFile { path, reason } => {
                write!(f, "skipping {}: {reason}", path.display())
            }
            Diagnostic::TaggerStderr { line } => write!(f, "{line}"),
        }
    }
}

pub trait DiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic)
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::TaggerStderr { .. } => log::info!("{diagnostic}"),
            _ => log::warn!("{diagnostic}"),
        }
    }
}

/// Records diagnostics in emission order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    seen: RefCell<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.seen.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.seen.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.borrow().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.seen.borrow_mut().push(diagnostic);
    }
}
