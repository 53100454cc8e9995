//! eggmeta: legacy egg-info to Metadata 2.1 converter
//!
//! This library converts legacy Python packaging metadata, a PKG-INFO
//! file plus a setuptools `requires.txt` from an egg-info directory, into
//! an ordered Metadata-Version 2.1 field list. Sectioned extras from
//! requires.txt are normalized, deduplicated, and rewritten into
//! per-requirement environment markers.
//!
//! # Example
//!
//! ```no_run
//! use eggmeta::pkginfo_to_metadata;
//!
//! let metadata = pkginfo_to_metadata("spam.egg-info", "PKG-INFO").unwrap();
//! for (name, value) in metadata.items() {
//!     println!("{}: {}", name, value);
//! }
//! ```

pub mod compat;
pub mod error;
pub mod extra;
pub mod marker;
pub mod metadata;
pub mod pkginfo;
pub mod requirement;
pub mod requires;

use std::fs;
use std::path::Path;

pub use error::ConvertError;
pub use error::MetadataError;
pub use error::ParseError;
pub use extra::normalize_extra;
pub use marker::MarkerExpr;
pub use metadata::MetadataDocument;
pub use pkginfo::PkgInfo;
pub use requirement::Requirement;
pub use requires::RequiresFile;
pub use requires::SectionHeader;

/// Convert an egg-info directory with PKG-INFO to the Metadata 2.1 format.
///
/// Reads `requires.txt` from `egg_info_path` and the key/value metadata
/// from `pkginfo_path`, then assembles the ordered field list. File access
/// failures propagate unchanged; malformed input fails with a parse error
/// rather than dropping data.
pub fn pkginfo_to_metadata(
    egg_info_path: impl AsRef<Path>,
    pkginfo_path: impl AsRef<Path>,
) -> Result<MetadataDocument, ConvertError> {
    let pkginfo_content = fs::read_to_string(pkginfo_path.as_ref())?;
    let requires_content = fs::read_to_string(egg_info_path.as_ref().join("requires.txt"))?;

    let pkg_info = PkgInfo::parse(&pkginfo_content)?;
    let requires = RequiresFile::parse(&requires_content)?;

    Ok(MetadataDocument::build(&pkg_info, &requires))
}
