//! Parser for line-oriented tagger/chunker output.
//!
//! Each line is one of:
//! - a phrase open tag, e.g. `<NC>`
//! - a phrase close tag, e.g. `</NC>`
//! - a `word\ttag\tlemma` triple
//!
//! Blank lines are ignored. The lemma is never kept.

use thiserror::Error;

use crate::types::{Chunk, PhraseIndex, TaggedToken};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaggerOutputError {
    #[error("Malformed tagger output at line {line_number}: expected word, tag and lemma separated by tabs, found {fields} field(s) in {line:?}")]
    MalformedLine {
        line_number: usize,
        line: String,
        fields: usize,
    },
}

/// One classified line of tagger output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Open(String),
    Close(String),
    Token(TaggedToken),
    Blank,
}

impl ParsedLine {
    /// Classify a single line. `line_number` is 1-based and only used for errors.
    pub fn classify(line_number: usize, line: &str) -> Result<Self, TaggerOutputError> {
        if line.is_empty() {
            return Ok(ParsedLine::Blank);
        }
        if line.starts_with("</") && line.ends_with('>') {
            return Ok(ParsedLine::Close(line.to_string()));
        }
        if line.starts_with('<') && line.ends_with('>') {
            return Ok(ParsedLine::Open(line.to_string()));
        }

        let fields: Vec<&str> = line.split('\t').collect();
        match fields.as_slice() {
            [word, tag, _lemma] => Ok(ParsedLine::Token(TaggedToken::new(*word, *tag))),
            _ => Err(TaggerOutputError::MalformedLine {
                line_number,
                line: line.to_string(),
                fields: fields.len(),
            }),
        }
    }
}

/// Chunker state between two lines.
///
/// `Outside` has no open phrase: tokens seen here are dropped, and a close
/// tag produces an empty chunk under the empty tag. `InsideChunk` collects
/// tokens until the next close tag. An open tag always starts a fresh chunk,
/// discarding whatever an unclosed previous phrase had collected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChunkState {
    #[default]
    Outside,
    InsideChunk {
        tag: String,
        tokens: Vec<TaggedToken>,
    },
}

impl ChunkState {
    /// Apply one line, appending any completed chunk to `index`.
    pub fn step(self, line: ParsedLine, index: &mut PhraseIndex) -> Self {
        match (self, line) {
            (_, ParsedLine::Open(tag)) => ChunkState::InsideChunk {
                tag,
                tokens: Vec::new(),
            },
            (ChunkState::InsideChunk { tag, tokens }, ParsedLine::Close(_)) => {
                index.push(Chunk::new(tag, tokens));
                ChunkState::Outside
            }
            (ChunkState::Outside, ParsedLine::Close(close)) => {
                log::debug!("close tag {close} without an open phrase");
                index.push(Chunk::new(String::new(), Vec::new()));
                ChunkState::Outside
            }
            (ChunkState::InsideChunk { tag, mut tokens }, ParsedLine::Token(token)) => {
                tokens.push(token);
                ChunkState::InsideChunk { tag, tokens }
            }
            (ChunkState::Outside, ParsedLine::Token(token)) => {
                log::debug!("dropping token outside any phrase: {token}");
                ChunkState::Outside
            }
            (state, ParsedLine::Blank) => state,
        }
    }
}

/// Parse plain tagging output into tokens, in order.
///
/// Phrase tags, if present, are skipped; no token is ever dropped.
pub fn parse_tokens(text: &str) -> Result<Vec<TaggedToken>, TaggerOutputError> {
    let mut tokens = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if let ParsedLine::Token(token) = ParsedLine::classify(i + 1, line)? {
            tokens.push(token);
        }
    }
    Ok(tokens)
}

/// Parse chunker output into a [`PhraseIndex`].
///
/// Stops at the first malformed line; nothing parsed so far is returned.
pub fn parse_phrases(text: &str) -> Result<PhraseIndex, TaggerOutputError> {
    let mut index = PhraseIndex::new();
    let mut state = ChunkState::Outside;
    for (i, line) in text.lines().enumerate() {
        let parsed = ParsedLine::classify(i + 1, line)?;
        state = state.step(parsed, &mut index);
    }
    if let ChunkState::InsideChunk { tag, tokens } = state {
        log::debug!("input ended inside {tag}; dropping {} token(s)", tokens.len());
    }
    Ok(index)
}
