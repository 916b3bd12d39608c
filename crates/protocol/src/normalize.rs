//! Name and text normalization
//!
//! Every natural key and dimension name is trimmed and byte-bounded before it
//! is used for a cache lookup or an INSERT, so that the in-memory dedup maps
//! and the database UNIQUE columns agree on what "the same name" means.

/// Maximum stored length of a natural key or dimension name, in bytes.
/// Matches the `VARCHAR(500)` columns in the schema.
pub const MAX_NAME_BYTES: usize = 500;

/// Maximum stored length of a synopsis, in bytes.
pub const MAX_SYNOPSIS_BYTES: usize = 10_000;

/// Trim surrounding whitespace and truncate to [`MAX_NAME_BYTES`] on a char
/// boundary.
pub fn normalize_name(raw: &str) -> String {
    truncate_bytes(raw.trim(), MAX_NAME_BYTES).to_owned()
}

/// Truncate a synopsis to [`MAX_SYNOPSIS_BYTES`] on a char boundary. No trim:
/// leading whitespace in long-form text is preserved as the provider sent it.
pub fn normalize_synopsis(raw: &str) -> String {
    truncate_bytes(raw, MAX_SYNOPSIS_BYTES).to_owned()
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace() {
        assert_eq!(normalize_name("  Penguin Books \t"), "Penguin Books");
    }

    #[test]
    fn short_names_unchanged() {
        assert_eq!(normalize_name("O'Reilly"), "O'Reilly");
    }

    #[test]
    fn truncates_at_500_bytes() {
        let long = "x".repeat(600);
        assert_eq!(normalize_name(&long).len(), 500);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'é' is two bytes; 250 of them land exactly on 500, one more forces
        // the cut back onto a boundary.
        let s = "é".repeat(251);
        let out = normalize_name(&s);
        assert!(out.len() <= 500);
        assert!(out.chars().all(|c| c == 'é'));
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn synopsis_keeps_inner_whitespace() {
        assert_eq!(normalize_synopsis("  two  spaces"), "  two  spaces");
        let long = "y".repeat(20_000);
        assert_eq!(normalize_synopsis(&long).len(), MAX_SYNOPSIS_BYTES);
    }
}
