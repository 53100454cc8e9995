//! Metadata 2.1 document assembly

mod types;

pub use types::MetadataDocument;
