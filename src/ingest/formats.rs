//! Semantic format detection for string values

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Semantic format of a string column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// ISO 8601 date (YYYY-MM-DD)
    Date,
    /// ISO 8601 date-time
    DateTime,
    /// Time of day (HH:MM:SS)
    Time,
    Email,
    Uri,
    Uuid,
    Ipv4,
    /// Phone number (E.164)
    Phone,
    /// ISO 3166-1 alpha-2 country code
    CountryCode,
    /// ISO 4217 currency code
    CurrencyCode,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Date => "date",
            Format::DateTime => "date-time",
            Format::Time => "time",
            Format::Email => "email",
            Format::Uri => "uri",
            Format::Uuid => "uuid",
            Format::Ipv4 => "ipv4",
            Format::Phone => "phone",
            Format::CountryCode => "country-code",
            Format::CurrencyCode => "currency-code",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const IPV4_OCTET: &str = r"(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)";

/// Patterns in match order; earlier entries are more specific
static PATTERNS: Lazy<Vec<(Format, Regex)>> = Lazy::new(|| {
    let ipv4 = format!(r"^({IPV4_OCTET}\.){{3}}{IPV4_OCTET}$");
    [
        (
            Format::Uuid,
            r"^[0-9a-fA-F]{8}(-[0-9a-fA-F]{4}){3}-[0-9a-fA-F]{12}$",
        ),
        (
            Format::DateTime,
            r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:?\d{2})?$",
        ),
        (Format::Date, r"^\d{4}-\d{2}-\d{2}$"),
        (Format::Time, r"^\d{2}:\d{2}(:\d{2}(\.\d+)?)?$"),
        (Format::Email, r"^[\w.%+-]+@[\w-]+(\.[\w-]+)*\.[a-zA-Z]{2,}$"),
        (Format::Uri, r"^(https?|ftp|file|s3)://\S+$"),
        (Format::Ipv4, ipv4.as_str()),
        (Format::Phone, r"^\+[1-9]\d{7,14}$"),
        (Format::CountryCode, r"^[A-Z]{2}$"),
        (Format::CurrencyCode, r"^[A-Z]{3}$"),
    ]
    .into_iter()
    .map(|(format, pattern)| (format, Regex::new(pattern).expect("valid format pattern")))
    .collect()
});

/// Detect the semantic format of a single value
pub fn detect_format(value: &str) -> Option<Format> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    PATTERNS
        .iter()
        .find(|(_, regex)| regex.is_match(value))
        .map(|(format, _)| *format)
}

/// Share of values detected as `format`
pub fn format_confidence(values: &[&str], format: Format) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let matches = values
        .iter()
        .filter(|v| detect_format(v) == Some(format))
        .count();

    matches as f64 / values.len() as f64
}

/// Pick the dominant format of a set of values, if it clears `threshold`
pub fn dominant_format(values: &[&str], threshold: f64) -> Option<Format> {
    let first = values.iter().find_map(|v| detect_format(v))?;
    (format_confidence(values, first) >= threshold).then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_date_and_datetime() {
        assert_eq!(detect_format("2024-01-15"), Some(Format::Date));
        assert_eq!(detect_format("2024-01-15T10:30:00Z"), Some(Format::DateTime));
        assert_eq!(detect_format("2024-01-15 10:30:00"), Some(Format::DateTime));
        assert_ne!(detect_format("2024-1-15"), Some(Format::Date));
    }

    #[test]
    fn test_detect_identifiers() {
        assert_eq!(
            detect_format("550e8400-e29b-41d4-a716-446655440000"),
            Some(Format::Uuid)
        );
        assert_eq!(detect_format("user@example.com"), Some(Format::Email));
        assert_eq!(detect_format("https://example.com/path"), Some(Format::Uri));
        assert_eq!(detect_format("192.168.1.1"), Some(Format::Ipv4));
        assert_eq!(detect_format("+4915112345678"), Some(Format::Phone));
    }

    #[test]
    fn test_detect_codes() {
        assert_eq!(detect_format("DE"), Some(Format::CountryCode));
        assert_eq!(detect_format("EUR"), Some(Format::CurrencyCode));
        assert_eq!(detect_format("hello world"), None);
        assert_eq!(detect_format("   "), None);
    }

    #[test]
    fn test_share_of_matches() {
        let ips = ["10.0.0.1", "10.0.0.2", "10.0.0.3", "gateway"];
        assert_eq!(format_confidence(&ips, Format::Ipv4), 0.75);
        assert_eq!(format_confidence(&[], Format::Ipv4), 0.0);
        assert_eq!(detect_format("256.1.1.1"), None);
    }

    #[test]
    fn test_dominant_format() {
        let emails = vec!["a@example.com", "b@example.com", "c@example.org"];
        assert_eq!(dominant_format(&emails, 0.9), Some(Format::Email));

        let mixed = vec!["a@example.com", "plain", "words"];
        assert_eq!(dominant_format(&mixed, 0.9), None);
        assert_eq!(dominant_format(&[], 0.9), None);
    }
}
