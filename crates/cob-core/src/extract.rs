//! Pattern extraction for contact identifiers.
//!
//! Both extractors return a `BTreeSet`, which gives per-batch dedup and a
//! deterministic (lexicographic) order for staging display.

use regex::Regex;
use std::collections::BTreeSet;

/// Whole-word email matches: local part of `[A-Za-z0-9._%+-]`, `@`, domain,
/// dot, 2+ letter top-level label. Surrounding punctuation is excluded.
pub fn extract_emails(text: &str) -> BTreeSet<String> {
    let pattern = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .expect("valid regex");
    pattern
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Russian-style phone numbers: `+7` or `8`, then exactly 10 digits grouped
/// 3-3-2-2, with space/hyphen/parens separators independently optional at
/// each boundary.
pub fn extract_phone_numbers(text: &str) -> BTreeSet<String> {
    let pattern = Regex::new(r"(?:\+7|8)[-\s]?\(?\d{3}\)?[-\s]?\d{3}[-\s]?\d{2}[-\s]?\d{2}")
        .expect("valid regex");
    pattern
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_emails_as_whole_words() {
        let found = extract_emails("contact a@b.com, bob@x.co.");
        let expected: BTreeSet<String> =
            ["a@b.com", "bob@x.co"].iter().map(|s| s.to_string()).collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn excludes_trailing_sentence_punctuation() {
        let found = extract_emails("write to ops@example.org.");
        assert!(found.contains("ops@example.org"));
        assert!(!found.contains("ops@example.org."));
    }

    #[test]
    fn dedupes_repeated_emails() {
        let found = extract_emails("a@b.com a@b.com a@b.com");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn rejects_bare_words_and_single_letter_tld() {
        assert!(extract_emails("not-an-email at example dot com").is_empty());
        assert!(extract_emails("x@y.z").is_empty());
    }

    #[test]
    fn accepts_all_phone_separator_styles() {
        for input in ["+7 926 123 45 67", "89261234567", "+7(926)123-45-67", "8 (926) 123-45-67"] {
            let found = extract_phone_numbers(input);
            assert_eq!(found.len(), 1, "no match in {input:?}");
        }
    }

    #[test]
    fn rejects_short_numbers() {
        assert!(extract_phone_numbers("+7 926 123 45").is_empty());
        assert!(extract_phone_numbers("8926123").is_empty());
    }

    #[test]
    fn empty_input_yields_empty_sets() {
        assert!(extract_emails("").is_empty());
        assert!(extract_phone_numbers("").is_empty());
    }

    #[test]
    fn finds_multiple_numbers_in_one_text() {
        let found = extract_phone_numbers("office 89261234567, duty +7 916 555 44 33");
        assert_eq!(found.len(), 2);
    }
}
