//! PKG-INFO reader (RFC822-style headers)

use crate::error::MetadataError;
use crate::extra::normalize_extra;

/// Fields read from a PKG-INFO file.
///
/// `Name` and `Version` are required. Declared `Provides-Extra` names are
/// collected raw; they only seed the extras set and are re-normalized during
/// assembly. Input `Metadata-Version` and `Requires-Dist` lines are
/// discarded: the converted document always declares version 2.1 and
/// regenerates every dependency line from requires.txt. All other headers
/// pass through in input order.
#[derive(Debug, Clone, Default)]
pub struct PkgInfo {
    pub name: String,
    pub version: String,
    pub provides_extra: Vec<String>,
    pub headers: Vec<(String, String)>,
    pub description: Option<String>,
}

impl PkgInfo {
    /// Parse PKG-INFO content
    pub fn parse(content: &str) -> Result<Self, MetadataError> {
        let mut info = PkgInfo::default();

        let mut in_headers = true;
        let mut current_key: Option<String> = None;
        let mut current_value = String::new();
        let mut body_lines = Vec::new();

        for line in content.lines() {
            if in_headers {
                if line.is_empty() {
                    if let Some(key) = current_key.take() {
                        info.set_field(&key, current_value.trim())?;
                        current_value.clear();
                    }
                    in_headers = false;
                    continue;
                }

                // Continuation line (email header folding)
                if line.starts_with(' ') || line.starts_with('\t') {
                    if current_key.is_some() {
                        current_value.push('\n');
                        current_value.push_str(line.trim());
                    }
                    continue;
                }

                if let Some(key) = current_key.take() {
                    info.set_field(&key, current_value.trim())?;
                    current_value.clear();
                }

                match line.split_once(':') {
                    Some((key, value)) => {
                        current_key = Some(key.trim().to_string());
                        current_value = value.trim().to_string();
                    }
                    None => {
                        return Err(MetadataError::Parse(format!(
                            "malformed header line: {:?}",
                            line
                        )));
                    }
                }
            } else {
                body_lines.push(line);
            }
        }

        if let Some(key) = current_key.take() {
            info.set_field(&key, current_value.trim())?;
        }

        if !body_lines.is_empty() {
            let body = body_lines.join("\n");
            let trimmed = body.trim();
            if !trimmed.is_empty() {
                info.description = Some(trimmed.to_string());
            }
        }

        if info.name.is_empty() {
            return Err(MetadataError::MissingField("Name".to_string()));
        }
        if info.version.is_empty() {
            return Err(MetadataError::MissingField("Version".to_string()));
        }

        Ok(info)
    }

    fn set_field(&mut self, key: &str, value: &str) -> Result<(), MetadataError> {
        match key {
            "Name" => self.name = value.to_string(),
            "Version" => self.version = value.to_string(),
            "Provides-Extra" => {
                if normalize_extra(value).is_empty() {
                    return Err(MetadataError::Parse(format!(
                        "invalid extra name: {:?}",
                        value
                    )));
                }
                self.provides_extra.push(value.to_string());
            }
            // Regenerated during assembly
            "Metadata-Version" | "Requires-Dist" => {}
            _ => self.headers.push((key.to_string(), value.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let content = "Metadata-Version: 0.0\nName: spam\nVersion: 0.1\n";
        let info = PkgInfo::parse(content).unwrap();
        assert_eq!(info.name, "spam");
        assert_eq!(info.version, "0.1");
        assert!(info.provides_extra.is_empty());
        assert!(info.headers.is_empty());
    }

    #[test]
    fn test_declared_extras_kept_raw_in_order() {
        let content = "Name: spam\nVersion: 0.1\nProvides-Extra: reST\nProvides-Extra: empty+extra\n";
        let info = PkgInfo::parse(content).unwrap();
        assert_eq!(info.provides_extra, vec!["reST", "empty+extra"]);
    }

    #[test]
    fn test_passthrough_headers_and_body() {
        let content = "Name: spam\nVersion: 0.1\nSummary: Lovely spam\nClassifier: A\nClassifier: B\n\nLong description.";
        let info = PkgInfo::parse(content).unwrap();
        assert_eq!(
            info.headers,
            vec![
                ("Summary".to_string(), "Lovely spam".to_string()),
                ("Classifier".to_string(), "A".to_string()),
                ("Classifier".to_string(), "B".to_string()),
            ]
        );
        assert_eq!(info.description.as_deref(), Some("Long description."));
    }

    #[test]
    fn test_continuation_lines() {
        let content = "Name: spam\nVersion: 0.1\nSummary: first\n second\n";
        let info = PkgInfo::parse(content).unwrap();
        assert_eq!(info.headers[0].1, "first\nsecond");
    }

    #[test]
    fn test_missing_required_fields() {
        assert!(matches!(
            PkgInfo::parse("Version: 0.1\n"),
            Err(MetadataError::MissingField(field)) if field == "Name"
        ));
        assert!(matches!(
            PkgInfo::parse("Name: spam\n"),
            Err(MetadataError::MissingField(field)) if field == "Version"
        ));
    }

    #[test]
    fn test_requires_dist_input_discarded() {
        let content = "Name: spam\nVersion: 0.1\nRequires-Dist: stale>=1\n";
        let info = PkgInfo::parse(content).unwrap();
        assert!(info.headers.is_empty());
    }

    #[test]
    fn test_header_line_without_colon_rejected() {
        let content = "Name: spam\nVersion: 0.1\nnot a header\n";
        assert!(matches!(
            PkgInfo::parse(content),
            Err(MetadataError::Parse(reason)) if reason.contains("not a header")
        ));
    }

    #[test]
    fn test_invalid_declared_extra() {
        let content = "Name: spam\nVersion: 0.1\nProvides-Extra: ++\n";
        assert!(matches!(
            PkgInfo::parse(content),
            Err(MetadataError::Parse(_))
        ));
    }
}
