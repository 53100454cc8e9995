//! Error types for eggmeta

use thiserror::Error;

/// Main error type for metadata conversion
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("File access error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors related to PKG-INFO parsing
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Errors related to requires.txt parsing
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid section header: [{0}]")]
    InvalidSectionHeader(String),

    #[error("Invalid requirement {line:?}: {reason}")]
    InvalidRequirement { line: String, reason: String },

    #[error("Invalid marker {marker:?}: {reason}")]
    InvalidMarker { marker: String, reason: String },
}
