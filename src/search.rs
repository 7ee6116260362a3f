//! Search term normalization and matching rules.

use regex::Regex;
use std::sync::OnceLock;

/// Inputs need more than three characters before a search runs.
pub const MIN_SEARCH_CHARS: usize = 4;

/// A trimmed search term with inner whitespace collapsed to single spaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn parse(raw: &str) -> Self {
        static WS: OnceLock<Regex> = OnceLock::new();
        let ws = WS.get_or_init(|| Regex::new(r"\s+").expect("static regex"));
        SearchTerm(ws.replace_all(raw.trim(), " ").into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_searchable(&self) -> bool {
        self.char_len() >= MIN_SEARCH_CHARS
    }

    /// `ILIKE` pattern matching the term anywhere, with wildcards in the term escaped.
    pub fn like_pattern(&self) -> String {
        let mut out = String::with_capacity(self.0.len() + 2);
        out.push('%');
        for c in self.0.chars() {
            if matches!(c, '%' | '_' | '\\') {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('%');
        out
    }

    /// Case-insensitive substring test, equivalent to the `ILIKE` pattern.
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_whitespace() {
        assert_eq!(SearchTerm::parse("  rust \t  analyzer \n").as_str(), "rust analyzer");
    }

    #[test]
    fn needs_more_than_three_chars() {
        assert!(!SearchTerm::parse("git").is_searchable());
        assert!(!SearchTerm::parse("  git   ").is_searchable());
        assert!(SearchTerm::parse("gitk").is_searchable());
        // counted in characters, not bytes
        assert!(!SearchTerm::parse("äöü").is_searchable());
    }

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(SearchTerm::parse("100%_a\\b").like_pattern(), "%100\\%\\_a\\\\b%");
    }

    #[test]
    fn matches_case_insensitively() {
        let term = SearchTerm::parse("DOCK");
        assert!(term.matches("Docker Compose"));
        assert!(!term.matches("Podman"));
    }
}
