//! Term extraction shared by indexing and querying.
//!
//! Both sides of the index must agree on what a term is, so documents and
//! queries go through the same function: lower-case, then split on every
//! character that is not alphanumeric.

use indexmap::IndexSet;

/// Splits `text` into lower-cased alphanumeric terms, in order, duplicates kept.
///
/// # Examples
///
/// ```
/// # use logsearch::searching::tokenizer::tokenize;
/// assert_eq!(tokenize("Disk FULL on node-7!"), vec!["disk", "full", "on", "node", "7"]);
/// assert!(tokenize("  --  ").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    terms(text).collect()
}

/// Distinct terms of `text`, in first-occurrence order.
pub fn unique_terms(text: &str) -> IndexSet<String> {
    terms(text).collect()
}

fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|piece| !piece.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_splits_on_punctuation() {
        assert_eq!(tokenize("Alpha Beta"), vec!["alpha", "beta"]);
        assert_eq!(tokenize("user@example.com"), vec!["user", "example", "com"]);
        assert_eq!(tokenize("a\tb\r\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_and_delimiter_only_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" .,;:/ ").is_empty());
    }

    #[test]
    fn test_unicode_letters_are_terms() {
        assert_eq!(tokenize("Ärger über Café"), vec!["ärger", "über", "café"]);
    }

    #[test]
    fn test_unique_terms_keeps_first_occurrence_order() {
        let terms: Vec<String> = unique_terms("beta Alpha beta ALPHA gamma").into_iter().collect();
        assert_eq!(terms, vec!["beta", "alpha", "gamma"]);
    }

    #[test]
    fn test_unique_terms_agree_with_tokenize() {
        for text in ["Disk FULL on node-7!", "Ärger über Café ärger", "a.b,a;B", ""] {
            let mut expected: Vec<String> = Vec::new();
            for term in tokenize(text) {
                if !expected.contains(&term) {
                    expected.push(term);
                }
            }
            assert_eq!(unique_terms(text).into_iter().collect::<Vec<_>>(), expected, "{text:?}");
        }
    }
}
