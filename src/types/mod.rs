pub mod identifiers;
pub mod tokens;

pub use identifiers::{DocumentId, DocumentIdError, DocumentVersion};
pub use tokens::{Chunk, PhraseIndex, TaggedToken};
