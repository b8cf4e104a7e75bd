//! Loaded post records.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// One loaded Markdown document plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier within a load
    pub id: String,

    /// Display title
    pub title: String,

    /// Publication date, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,

    /// Navigation category
    pub category: String,

    /// Optional navigation subcategory
    pub subcategory: Option<String>,

    /// Markdown body with local images already inlined
    pub content: String,

    /// Source file name
    pub filename: String,
}

impl Post {
    /// Date formatted the way it is displayed and serialized.
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Parse a front matter date.
///
/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps (the calendar date of the
/// timestamp is kept). Anything else is rejected.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|timestamp| timestamp.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_dates() {
        assert_eq!(
            parse_date("2024-01-05"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(
            parse_date(" 2023-12-31 "),
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
    }

    #[test]
    fn parses_rfc3339_timestamps() {
        assert_eq!(
            parse_date("2024-03-10T08:30:00+02:00"),
            NaiveDate::from_ymd_opt(2024, 3, 10)
        );
    }

    #[test]
    fn rejects_other_formats() {
        assert_eq!(parse_date("January 5, 2024"), None);
        assert_eq!(parse_date("05/01/2024"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn serializes_date_as_iso_string() {
        let post = Post {
            id: "a".to_string(),
            title: "A".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            category: "Tech".to_string(),
            subcategory: None,
            content: "Hello".to_string(),
            filename: "a.md".to_string(),
        };

        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(json["date"], "2024-01-02");
        assert_eq!(json["subcategory"], serde_json::Value::Null);
        assert_eq!(post.date_string(), "2024-01-02");
    }
}
