//! Requirement specifiers (PEP 508)

use std::fmt;

use crate::error::ParseError;
use crate::marker::MarkerExpr;

const VERSION_OPS: [&str; 8] = ["===", "==", "!=", "<=", ">=", "~=", "<", ">"];

/// Single parsed dependency specifier
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub name: String,
    pub extras: Vec<String>,
    pub specifier: Option<String>,
    pub url: Option<String>,
    pub marker: Option<MarkerExpr>,
}

impl Requirement {
    /// Parse a requirement line
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let line = input.trim();
        let err = |reason: &str| ParseError::InvalidRequirement {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        let name_len = line
            .char_indices()
            .take_while(|&(i, c)| {
                if i == 0 {
                    c.is_ascii_alphanumeric()
                } else {
                    c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'
                }
            })
            .count();
        if name_len == 0 {
            return Err(err("missing package name"));
        }
        let name = line[..name_len].to_string();
        let mut rest = line[name_len..].trim_start();

        let mut extras = Vec::new();
        if let Some(after_bracket) = rest.strip_prefix('[') {
            let close = after_bracket
                .find(']')
                .ok_or_else(|| err("unclosed extras bracket"))?;
            let inner = &after_bracket[..close];
            if !inner.trim().is_empty() {
                for extra in inner.split(',') {
                    let extra = extra.trim();
                    if extra.is_empty() {
                        return Err(err("empty name in extras list"));
                    }
                    extras.push(extra.to_string());
                }
            }
            rest = after_bracket[close + 1..].trim_start();
        }

        let mut specifier = None;
        let mut url = None;
        let marker_text;

        if let Some(after_at) = rest.strip_prefix('@') {
            // Direct URL reference; the marker separator is a ';' that
            // follows whitespace, so a ';' embedded in the URL is kept.
            let after_at = after_at.trim_start();
            let split = after_at
                .char_indices()
                .find(|&(i, c)| c == ';' && after_at[..i].ends_with(|c: char| c.is_whitespace()))
                .map(|(i, _)| i);
            let (url_text, marker_part) = match split {
                Some(i) => (after_at[..i].trim(), Some(&after_at[i + 1..])),
                None => (after_at.trim(), None),
            };
            if url_text.is_empty() {
                return Err(err("missing URL after '@'"));
            }
            if url_text.contains(char::is_whitespace) {
                return Err(err("whitespace inside URL"));
            }
            url = Some(url_text.to_string());
            marker_text = marker_part;
        } else {
            let (spec_text, marker_part) = match rest.find(';') {
                Some(i) => (&rest[..i], Some(&rest[i + 1..])),
                None => (rest, None),
            };
            let mut spec_text = spec_text.trim();
            // Parenthesized version specifiers are accepted and unwrapped.
            if let Some(inner) = spec_text
                .strip_prefix('(')
                .and_then(|s| s.strip_suffix(')'))
            {
                spec_text = inner.trim();
            }
            if !spec_text.is_empty() {
                specifier = Some(normalize_specifier(spec_text).map_err(|reason| err(&reason))?);
            }
            marker_text = marker_part;
        }

        let marker = match marker_text {
            Some(text) if text.trim().is_empty() => return Err(err("empty marker after ';'")),
            Some(text) => Some(MarkerExpr::parse(text.trim())?),
            None => None,
        };

        Ok(Requirement {
            name,
            extras,
            specifier,
            url,
            marker,
        })
    }

    /// Re-condition this requirement for the section it appeared in.
    ///
    /// Conjoins, in order: the requirement's own marker, the section's
    /// marker, and `extra == "<canonical>"` for a named section.
    pub fn with_context(&self, section_marker: Option<&MarkerExpr>, extra: Option<&str>) -> Self {
        let mut marker = self.marker.clone();
        if let Some(section_marker) = section_marker {
            marker = Some(match marker {
                Some(existing) => existing.and(section_marker.clone()),
                None => section_marker.clone(),
            });
        }
        if let Some(extra) = extra {
            let atom = MarkerExpr::extra_equals(extra);
            marker = Some(match marker {
                Some(existing) => existing.and(atom),
                None => atom,
            });
        }
        Requirement {
            marker,
            ..self.clone()
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.extras.is_empty() {
            let mut extras: Vec<&str> = self.extras.iter().map(String::as_str).collect();
            extras.sort_unstable();
            write!(f, "[{}]", extras.join(","))?;
        }
        if let Some(url) = &self.url {
            write!(f, "@ {}", url)?;
            if let Some(marker) = &self.marker {
                write!(f, " ; {}", marker)?;
            }
        } else {
            if let Some(specifier) = &self.specifier {
                f.write_str(specifier)?;
            }
            if let Some(marker) = &self.marker {
                write!(f, "; {}", marker)?;
            }
        }
        Ok(())
    }
}

/// Validate a version specifier and strip insignificant whitespace
fn normalize_specifier(text: &str) -> Result<String, String> {
    let mut clauses = Vec::new();
    for clause in text.split(',') {
        let clause = clause.trim();
        let op = VERSION_OPS
            .iter()
            .find(|op| clause.starts_with(**op))
            .ok_or_else(|| format!("expected version operator in {:?}", clause))?;
        let version = clause[op.len()..].trim();
        if version.is_empty() {
            return Err(format!("missing version in {:?}", clause));
        }
        if version.contains(char::is_whitespace) {
            return Err(format!("whitespace inside version in {:?}", clause));
        }
        clauses.push(format!("{}{}", op, version));
    }
    Ok(clauses.join(","))
}
