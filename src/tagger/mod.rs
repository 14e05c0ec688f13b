pub mod config;
pub mod parser;
pub mod process;

use crate::types::{PhraseIndex, TaggedToken};

pub use config::{ConfigError, Encoding, TaggerConfig};
pub use parser::{parse_phrases, parse_tokens, ChunkState, ParsedLine, TaggerOutputError};
pub use process::{ProcessTagger, TaggerError};

/// Text in, tagged tokens out.
pub trait TaggerClient {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Part-of-speech tag `text`.
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, Self::Error>;

    /// Tag `text` and group it into phrase chunks.
    fn chunk(&self, text: &str) -> Result<PhraseIndex, Self::Error>;
}

/// One token per line, with ASCII punctuation split off as its own token.
pub fn prepare_input(text: &str) -> String {
    let mut spaced = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if c.is_ascii_punctuation() {
            spaced.push(' ');
            spaced.push(c);
            spaced.push(' ');
        } else {
            spaced.push(c);
        }
    }
    spaced.split_whitespace().collect::<Vec<_>>().join("\n")
}
