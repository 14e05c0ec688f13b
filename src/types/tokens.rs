use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A word together with its part-of-speech tag.
///
/// Equality and hashing ignore the case of the surface form but not of the
/// tag: `("Run", "NN")` and `("run", "NN")` are the same feature,
/// `("run", "NN")` and `("run", "VB")` are not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedToken {
    surface: String,
    tag: String,
}

impl TaggedToken {
    pub fn new(surface: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            tag: tag.into(),
        }
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// A copy with the surface form lowercased and the tag untouched.
    pub fn to_lowercase(&self) -> Self {
        Self {
            surface: self.surface.to_lowercase(),
            tag: self.tag.clone(),
        }
    }
}

impl PartialEq for TaggedToken {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.surface.to_lowercase() == other.surface.to_lowercase()
    }
}

impl Eq for TaggedToken {}

impl Hash for TaggedToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.surface.to_lowercase().hash(state);
        self.tag.hash(state);
    }
}

impl fmt::Display for TaggedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.surface, self.tag)
    }
}

/// A phrase span: the tokens found between a phrase start tag and its end tag.
///
/// The end tag is always derived from the start tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    start_tag: String,
    end_tag: String,
    tokens: Vec<TaggedToken>,
}

impl Chunk {
    /// Build a chunk, deriving the end tag from the start tag (`<NP>` -> `</NP>`).
    pub fn new(start_tag: impl Into<String>, tokens: Vec<TaggedToken>) -> Self {
        let start_tag = start_tag.into();
        let end_tag = close_tag_for(&start_tag);
        Self {
            start_tag,
            end_tag,
            tokens,
        }
    }

    pub fn start_tag(&self) -> &str {
        &self.start_tag
    }

    pub fn end_tag(&self) -> &str {
        &self.end_tag
    }

    pub fn tokens(&self) -> &[TaggedToken] {
        &self.tokens
    }

    /// Surface forms joined by single spaces.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(TaggedToken::surface)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start_tag)?;
        for token in &self.tokens {
            write!(f, " {token}")?;
        }
        write!(f, " {}", self.end_tag)
    }
}

/// `<X>` -> `</X>`. The empty tag stays empty.
pub fn close_tag_for(start_tag: &str) -> String {
    start_tag.replace('<', "</")
}

/// Phrase tag -> chunks found under that tag, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhraseIndex {
    inner: BTreeMap<String, Vec<Chunk>>,
}

impl PhraseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk under its start tag, creating the entry if absent.
    pub fn push(&mut self, chunk: Chunk) {
        self.inner
            .entry(chunk.start_tag.clone())
            .or_default()
            .push(chunk);
    }

    pub fn get(&self, tag: &str) -> Option<&[Chunk]> {
        self.inner.get(tag).map(Vec::as_slice)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Chunk>)> {
        self.inner.iter()
    }

    /// Total number of chunks across all tags.
    pub fn chunk_count(&self) -> usize {
        self.inner.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
