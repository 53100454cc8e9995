//! Extra-name normalization for optional dependency groups

/// Normalize a raw extra name to its canonical form.
///
/// Lowercases the name and collapses every run of characters outside
/// `[a-z0-9]` into a single hyphen; leading and trailing separators are
/// stripped. Variant spellings that normalize identically denote the
/// same extra.
pub fn normalize_extra(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut in_separator = false;

    for c in raw.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            if in_separator && !result.is_empty() {
                result.push('-');
            }
            result.push(c);
            in_separator = false;
        } else {
            in_separator = true;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_simple() {
        assert_eq!(normalize_extra("test"), "test");
        assert_eq!(normalize_extra("reST"), "rest");
        assert_eq!(normalize_extra("Signatures"), "signatures");
        assert_eq!(normalize_extra("faster-signatures"), "faster-signatures");
    }

    #[test]
    fn test_normalize_separator_runs() {
        assert_eq!(normalize_extra("empty+extra"), "empty-extra");
        assert_eq!(normalize_extra("a..b__c"), "a-b-c");
        assert_eq!(normalize_extra("a +-. b"), "a-b");
    }

    #[test]
    fn test_normalize_strips_edges() {
        assert_eq!(normalize_extra("-leading"), "leading");
        assert_eq!(normalize_extra("trailing--"), "trailing");
        assert_eq!(normalize_extra("++"), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for raw in ["empty+extra", "reST", "Faster--Signatures", "a.b"] {
            let once = normalize_extra(raw);
            assert_eq!(normalize_extra(&once), once);
        }
    }
}
