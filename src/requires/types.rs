//! Types for the setuptools requires.txt format
//!
//! The file is INI-like: an optional leading unlabeled block of
//! unconditional requirements, then `[section]` blocks. A section header is
//! a bare extra name, `:<marker>` for a marker without an extra, or
//! `<extra>:<marker>` for both.

use crate::error::ParseError;
use crate::extra::normalize_extra;
use crate::marker::MarkerExpr;
use crate::requirement::Requirement;

/// Parsed form of a section header
#[derive(Debug, Clone, PartialEq)]
pub enum SectionHeader {
    /// The leading unlabeled block
    Unconditional,
    /// `[extra]`
    NamedExtra(String),
    /// `[:marker]`
    MarkerOnly(MarkerExpr),
    /// `[extra:marker]`
    NamedExtraWithMarker(String, MarkerExpr),
}

impl SectionHeader {
    fn parse(raw: &str) -> Result<Self, ParseError> {
        let err = || ParseError::InvalidSectionHeader(raw.to_string());

        if raw.trim().is_empty() {
            return Err(err());
        }

        let (name, marker) = match raw.split_once(':') {
            Some((name, marker)) => {
                if marker.trim().is_empty() {
                    return Err(err());
                }
                (name.trim(), Some(MarkerExpr::parse(marker.trim())?))
            }
            None => (raw.trim(), None),
        };

        if name.is_empty() {
            // `:marker` form, checked non-empty above
            return Ok(SectionHeader::MarkerOnly(marker.ok_or_else(err)?));
        }
        if normalize_extra(name).is_empty() {
            return Err(err());
        }

        Ok(match marker {
            Some(marker) => SectionHeader::NamedExtraWithMarker(name.to_string(), marker),
            None => SectionHeader::NamedExtra(name.to_string()),
        })
    }

    /// Raw extra name, if this section declares one
    pub fn extra_name(&self) -> Option<&str> {
        match self {
            SectionHeader::NamedExtra(name) => Some(name),
            SectionHeader::NamedExtraWithMarker(name, _) => Some(name),
            _ => None,
        }
    }

    /// Section-level marker, if any
    pub fn marker(&self) -> Option<&MarkerExpr> {
        match self {
            SectionHeader::MarkerOnly(marker) => Some(marker),
            SectionHeader::NamedExtraWithMarker(_, marker) => Some(marker),
            _ => None,
        }
    }
}

/// One section: raw header text, parsed header, and its requirement lines
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Raw header text, empty for the leading unlabeled block
    pub raw: String,
    pub header: SectionHeader,
    pub requirements: Vec<Requirement>,
}

/// Complete parsed requires.txt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequiresFile {
    pub sections: Vec<Section>,
}

impl RequiresFile {
    /// Parse requires.txt content
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let mut sections = vec![Section {
            raw: String::new(),
            header: SectionHeader::Unconditional,
            requirements: Vec::new(),
        }];

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') {
                let inner = line
                    .strip_prefix('[')
                    .and_then(|s| s.strip_suffix(']'))
                    .ok_or_else(|| ParseError::InvalidSectionHeader(line.to_string()))?;
                sections.push(Section {
                    raw: inner.to_string(),
                    header: SectionHeader::parse(inner)?,
                    requirements: Vec::new(),
                });
            } else {
                let requirement = Requirement::parse(line)?;
                sections
                    .last_mut()
                    .expect("sections is never empty")
                    .requirements
                    .push(requirement);
            }
        }

        Ok(RequiresFile { sections })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_forms() {
        assert_eq!(
            SectionHeader::parse("test").unwrap(),
            SectionHeader::NamedExtra("test".to_string())
        );
        assert!(matches!(
            SectionHeader::parse(":sys_platform==\"win32\"").unwrap(),
            SectionHeader::MarkerOnly(_)
        ));
        let header = SectionHeader::parse("Signatures:sys_platform!=\"win32\"").unwrap();
        assert_eq!(header.extra_name(), Some("Signatures"));
        assert_eq!(
            header.marker().unwrap().to_string(),
            "sys_platform != \"win32\""
        );
    }

    #[test]
    fn test_parse_header_errors() {
        assert!(SectionHeader::parse("").is_err());
        assert!(SectionHeader::parse(":").is_err());
        assert!(SectionHeader::parse("name:").is_err());
        assert!(SectionHeader::parse("++").is_err());
        assert!(SectionHeader::parse(":not a marker").is_err());
    }

    #[test]
    fn test_parse_leading_unconditional_block() {
        let requires = RequiresFile::parse("pip\n\n[test]\npytest>=3.0.0\n").unwrap();
        assert_eq!(requires.sections.len(), 2);
        assert_eq!(requires.sections[0].header, SectionHeader::Unconditional);
        assert_eq!(requires.sections[0].requirements[0].name, "pip");
        assert_eq!(requires.sections[1].raw, "test");
        assert_eq!(requires.sections[1].requirements.len(), 1);
    }

    #[test]
    fn test_empty_section_registers_extra() {
        let requires = RequiresFile::parse("[empty+extra]\n\n[test]\npytest\n").unwrap();
        assert_eq!(requires.sections[1].raw, "empty+extra");
        assert!(requires.sections[1].requirements.is_empty());
    }

    #[test]
    fn test_malformed_lines_rejected() {
        assert!(RequiresFile::parse("[unclosed\n").is_err());
        assert!(RequiresFile::parse("[]\n").is_err());
        assert!(RequiresFile::parse("[ok]\n===broken\n").is_err());
    }
}
