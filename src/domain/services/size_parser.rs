//! Free-text size lists from the per-design order questions.

use crate::domain::model::Size;
use crate::utils::error::{EtlError, Result};
use regex::Regex;

/// Parses hand-typed size lists such as `M,M,S`, `1 L`, `1'M'` or `S.`.
#[derive(Debug, Clone)]
pub struct SizeParser {
    pattern: Regex,
}

impl SizeParser {
    pub fn new() -> Result<Self> {
        // Two-letter codes first so `XL` is not read as `L` nor `XS` as `S`.
        let pattern =
            Regex::new(r"XXL|XL|XS|[SML]").map_err(|e| EtlError::ConfigValidationError {
                field: "size_pattern".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { pattern })
    }

    /// One [`Size`] per ordered unit, in the order written. Blank entries and
    /// `none` yield nothing.
    pub fn parse(&self, entry: &str) -> Vec<Size> {
        let trimmed = entry.trim();
        if trimmed.is_empty() || matches!(trimmed.to_lowercase().as_str(), "none" | "nan") {
            return Vec::new();
        }

        let cleaned: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '\'' | '"' | '.'))
            .collect();

        cleaned
            .split(',')
            .map(|token| token.trim().to_uppercase())
            .filter(|token| !token.is_empty())
            .filter_map(|token| self.parse_token(&token))
            .collect()
    }

    fn parse_token(&self, token: &str) -> Option<Size> {
        if let Some(found) = self.pattern.find(token) {
            return Some(Size::from(found.as_str()));
        }
        if token.len() <= 3 && token.chars().all(|c| c.is_ascii_alphabetic()) {
            return Some(Size::Other(token.to_string()));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(entry: &str) -> Vec<String> {
        SizeParser::new()
            .unwrap()
            .parse(entry)
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_comma_separated_list_keeps_order_and_duplicates() {
        assert_eq!(parse("M,M,S"), ["M", "M", "S"]);
        assert_eq!(parse(" xl , XXL,l "), ["XL", "XXL", "L"]);
    }

    #[test]
    fn test_noise_around_size_codes() {
        assert_eq!(parse("1 L"), ["L"]);
        assert_eq!(parse("S."), ["S"]);
        assert_eq!(parse("1'M'"), ["M"]);
        assert_eq!(parse("\"XL\""), ["XL"]);
        assert_eq!(parse("2 XXL"), ["XXL"]);
    }

    #[test]
    fn test_empty_and_none_entries() {
        assert!(parse("None").is_empty());
        assert!(parse("none").is_empty());
        assert!(parse("nan").is_empty());
        assert!(parse("   ").is_empty());
        assert!(parse(",,").is_empty());
    }

    #[test]
    fn test_extra_small_is_not_read_as_small() {
        assert_eq!(parse("XS"), ["XS"]);
        assert_eq!(parse("xs,m"), ["XS", "M"]);
        assert_eq!(parse("1 xs."), ["XS"]);
    }

    #[test]
    fn test_short_alphabetic_fallback() {
        assert_eq!(parse("XXX"), ["XXX"]);
        assert!(parse("12").is_empty());
        assert!(parse("NONE,").is_empty());
    }
}
