//! Small per-field normalizations shared by the pipelines.

use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// First of `formats` that reads `raw` as a local date-time.
pub fn parse_timestamp(raw: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Names longer than `max_len` characters are cut to their first word.
pub fn shorten_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        return name.to_string();
    }
    let first = name.split_whitespace().next().unwrap_or(name);
    tracing::info!("📝 Shortened '{}' to '{}'", name, first);
    first.to_string()
}

/// Exact alias lookup after trimming; unknown domains pass through.
pub fn map_domain(domain: &str, aliases: &BTreeMap<String, String>) -> String {
    let domain = domain.trim();
    aliases
        .get(domain)
        .cloned()
        .unwrap_or_else(|| domain.to_string())
}

/// Whole-number reading of a spreadsheet cell: `7`, `7.0` and ` 07 ` all
/// give 7. Negative, fractional-overflow and non-numeric cells give `None`.
pub fn parse_whole_number(raw: &str) -> Option<u32> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return None;
    }
    Some(value.trunc() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_name() {
        assert_eq!(shorten_name("Asha Rao", 12), "Asha Rao");
        assert_eq!(shorten_name("Venkataraman Iyer", 12), "Venkataraman");
        assert_eq!(shorten_name("Abcdefghijklmnop", 12), "Abcdefghijklmnop");
    }

    #[test]
    fn test_map_domain() {
        let mut aliases = BTreeMap::new();
        aliases.insert(
            "Media & Public Relations".to_string(),
            "Media and PR".to_string(),
        );
        assert_eq!(map_domain(" Media & Public Relations ", &aliases), "Media and PR");
        assert_eq!(map_domain("Tech", &aliases), "Tech");
    }

    #[test]
    fn test_parse_timestamp() {
        let formats = vec!["%m/%d/%Y %H:%M:%S".to_string(), "%Y-%m-%d %H:%M:%S".to_string()];
        let a = parse_timestamp("10/14/2025 9:05:00", &formats).unwrap();
        let b = parse_timestamp("2025-10-14 09:06:00", &formats).unwrap();
        assert!(a < b);
        assert!(parse_timestamp("yesterday", &formats).is_none());
    }

    #[test]
    fn test_parse_whole_number() {
        assert_eq!(parse_whole_number("7"), Some(7));
        assert_eq!(parse_whole_number("7.0"), Some(7));
        assert_eq!(parse_whole_number(" 07 "), Some(7));
        assert_eq!(parse_whole_number("12.9"), Some(12));
        assert_eq!(parse_whole_number("-3"), None);
        assert_eq!(parse_whole_number("seven"), None);
        assert_eq!(parse_whole_number("NaN"), None);
    }
}
