//! Backward-compatibility shim for the old conversion entry point

use std::path::Path;
use std::sync::Once;

use crate::error::ConvertError;
use crate::metadata::MetadataDocument;

static DEPRECATION_NOTICE: Once = Once::new();

/// Old name for [`crate::pkginfo_to_metadata`].
///
/// Forwards to the current implementation; warns once per process on first
/// use.
#[deprecated(since = "0.2.0", note = "renamed to `pkginfo_to_metadata`")]
pub fn egg_info_to_metadata(
    egg_info_path: impl AsRef<Path>,
    pkginfo_path: impl AsRef<Path>,
) -> Result<MetadataDocument, ConvertError> {
    DEPRECATION_NOTICE.call_once(|| {
        tracing::warn!(
            "egg_info_to_metadata has been renamed to pkginfo_to_metadata; \
             the old name will be removed in a future release"
        );
    });
    crate::pkginfo_to_metadata(egg_info_path, pkginfo_path)
}
