pub mod document;
pub mod enums;

pub use document::{CatalogDocument, DocumentView};
pub use enums::{DocumentKind, DocumentStatus, KindKey, StatusKey};
