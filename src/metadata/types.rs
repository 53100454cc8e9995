//! Ordered Metadata 2.1 field list and output assembly

use std::fmt::Write;

use crate::extra::normalize_extra;
use crate::pkginfo::PkgInfo;
use crate::requires::RequiresFile;
use crate::requires::Section;
use crate::requires::SectionHeader;

/// Ordered list of Metadata 2.1 fields plus an optional description body.
///
/// Field order is part of the contract: `Metadata-Version`, `Name` and
/// `Version` always come first, followed by passthrough PKG-INFO headers,
/// then the regenerated `Requires-Dist`/`Provides-Extra` block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataDocument {
    fields: Vec<(String, String)>,
    description: Option<String>,
}

impl MetadataDocument {
    /// Assemble a document from parsed PKG-INFO and requires.txt.
    ///
    /// Sections are processed in ascending raw-header order (the unlabeled
    /// block first), matching the field sequence setuptools-era tooling
    /// produced: unconditional and marker-only dependency lines, then the
    /// named extras. A `Provides-Extra` is emitted at the first section
    /// whose name maps to a new canonical extra; variant spellings merge
    /// under it, each section's lines at that section's own position.
    pub fn build(pkg_info: &PkgInfo, requires: &RequiresFile) -> Self {
        let mut doc = MetadataDocument::default();
        doc.push("Metadata-Version", "2.1");
        doc.push("Name", &pkg_info.name);
        doc.push("Version", &pkg_info.version);
        for (key, value) in &pkg_info.headers {
            doc.push(key, value);
        }
        doc.description = pkg_info.description.clone();

        let mut sections: Vec<&Section> = requires.sections.iter().collect();
        sections.sort_by(|a, b| a.raw.cmp(&b.raw));

        for section in &sections {
            let section_marker = match &section.header {
                SectionHeader::Unconditional => None,
                SectionHeader::MarkerOnly(marker) => Some(marker),
                _ => continue,
            };
            for requirement in &section.requirements {
                let conditioned = requirement.with_context(section_marker, None);
                doc.push_unique("Requires-Dist", conditioned.to_string());
            }
        }

        let mut seen_extras: Vec<String> = Vec::new();
        for section in &sections {
            let name = match section.header.extra_name() {
                Some(name) => name,
                None => continue,
            };
            let canonical = normalize_extra(name);
            if !seen_extras.contains(&canonical) {
                doc.push_unique("Provides-Extra", canonical.clone());
                seen_extras.push(canonical.clone());
            }
            for requirement in &section.requirements {
                let conditioned =
                    requirement.with_context(section.header.marker(), Some(&canonical));
                doc.push_unique("Requires-Dist", conditioned.to_string());
            }
        }

        // Declared extras with no section still exist as empty extras.
        for raw in &pkg_info.provides_extra {
            let canonical = normalize_extra(raw);
            if !seen_extras.contains(&canonical) {
                doc.push_unique("Provides-Extra", canonical.clone());
                seen_extras.push(canonical);
            }
        }

        doc
    }

    fn push(&mut self, name: &str, value: &str) {
        self.fields.push((name.to_string(), value.to_string()));
    }

    fn push_unique(&mut self, name: &str, value: String) {
        let exists = self
            .fields
            .iter()
            .any(|(key, existing)| key == name && *existing == value);
        if !exists {
            self.fields.push((name.to_string(), value));
        }
    }

    /// Ordered (field-name, field-value) pairs
    pub fn items(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Description body, if the PKG-INFO carried one
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Serialize to the header-style text format.
    ///
    /// Long values are written as-is; continuation-line folding is left to
    /// the consumer.
    pub fn render(&self) -> String {
        let mut output = String::new();
        for (key, value) in &self.fields {
            writeln!(output, "{}: {}", key, value).unwrap();
        }
        if let Some(description) = &self.description {
            writeln!(output).unwrap();
            output.push_str(description);
        }
        output
    }
}
