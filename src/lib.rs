//! Tagger-output chunk parsing and context-window feature encoding.
//!
//! `studyref-core` turns the line-oriented output of an external
//! part-of-speech tagger/chunker into tagged tokens and phrase chunks, and
//! turns raw left/right context strings into fixed-width feature rows for a
//! binary "is this span a study reference?" classifier. Feature rows are
//! exported in ARFF so an external learner can consume them directly.
//!
//! The crate also carries the thin plumbing around those cores: a
//! process-backed tagger client and a recursive document indexer.

pub mod diagnostics;
pub mod document;
pub mod export;
pub mod features;
pub mod indexing;
pub mod tagger;
pub mod types;
