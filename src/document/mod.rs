pub mod document;
pub mod metadata;

pub use crate::types::identifiers::{DocumentId, DocumentVersion};
pub use document::{Document, DocumentError};
pub use metadata::{Metadata, MetadataValue};
