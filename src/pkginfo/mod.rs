//! PKG-INFO parsing

mod types;

pub use types::PkgInfo;
