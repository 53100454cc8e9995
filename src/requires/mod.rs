//! Sectioned requires.txt parsing

mod types;

pub use types::RequiresFile;
pub use types::Section;
pub use types::SectionHeader;
