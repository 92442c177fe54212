// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::error::EpisodeError;
use crate::feed::Item;

/// Validated metadata of one feed item
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeInfo {
    pub guid: String,
    pub published: DateTime<FixedOffset>,
    /// Only needed once the item turns out to carry media
    pub description: Option<String>,
}

impl EpisodeInfo {
    /// Extract the fields every item must carry
    pub fn from_item(item: &Item) -> Result<Self, EpisodeError> {
        let guid = item
            .guid
            .clone()
            .ok_or(EpisodeError::MissingField { field: "guid" })?;

        let pub_date = item
            .pub_date
            .as_deref()
            .ok_or(EpisodeError::MissingField { field: "pubDate" })?;
        let published = parse_pub_date(pub_date)?;

        Ok(Self {
            guid,
            published,
            description: item.description.clone(),
        })
    }

    /// Short title derived from the description, which must be present
    pub fn title(&self) -> Result<String, EpisodeError> {
        self.description
            .as_deref()
            .map(derive_title)
            .ok_or(EpisodeError::MissingField {
                field: "description",
            })
    }

    /// Calendar date of publication in the feed's own offset
    pub fn published_date(&self) -> NaiveDate {
        self.published.date_naive()
    }
}

/// Line boundaries recognised when picking the first line of a description
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Derive a short title from a free-text description
///
/// Text containing a newline contributes only its first line (trimmed); the
/// result is then cut at the first `.`.
pub fn derive_title(description: &str) -> String {
    let line = if description.contains('\n') {
        description.split(is_line_break).next().unwrap_or_default().trim()
    } else {
        description
    };

    match line.split_once('.') {
        Some((head, _)) => head.to_string(),
        None => line.to_string(),
    }
}

/// Parse an RSS `pubDate`
pub fn parse_pub_date(date_str: &str) -> Result<DateTime<FixedOffset>, EpisodeError> {
    DateTime::parse_from_rfc2822(date_str)
        .or_else(|_| parse_relaxed_date(date_str))
        .map_err(|source| EpisodeError::InvalidDate {
            date_str: date_str.to_string(),
            source,
        })
}

/// Dates that don't strictly conform to RFC 2822
fn parse_relaxed_date(date_str: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    const FORMATS: [&str; 3] = [
        "%a, %d %b %Y %H:%M:%S %z",
        "%Y-%m-%dT%H:%M:%S%:z",
        "%Y-%m-%d %H:%M:%S %z",
    ];

    let date_str = date_str.trim();
    FORMATS[1..].iter().fold(
        DateTime::parse_from_str(date_str, FORMATS[0]),
        |parsed, format| parsed.or_else(|_| DateTime::parse_from_str(date_str, format)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(guid: Option<&str>, pub_date: Option<&str>, description: Option<&str>) -> Item {
        Item {
            guid: guid.map(String::from),
            pub_date: pub_date.map(String::from),
            description: description.map(String::from),
            enclosure: None,
        }
    }

    // === Title derivation ===

    #[test]
    fn title_is_first_sentence() {
        assert_eq!(derive_title("Episode One. Extra text"), "Episode One");
    }

    #[test]
    fn title_without_dot_is_whole_text() {
        assert_eq!(derive_title("Episode One"), "Episode One");
    }

    #[test]
    fn title_uses_first_line_of_multiline_text() {
        assert_eq!(
            derive_title("  Live from Prague  \nSecond line. With a dot"),
            "Live from Prague"
        );
    }

    #[test]
    fn title_cuts_first_line_at_dot() {
        assert_eq!(derive_title("Part 1. Intro\nmore"), "Part 1");
    }

    #[test]
    fn single_line_title_is_not_trimmed() {
        assert_eq!(derive_title(" spaced "), " spaced ");
    }

    #[test]
    fn leading_dot_yields_empty_title() {
        assert_eq!(derive_title(".hidden"), "");
    }

    #[test]
    fn title_stops_at_any_line_break() {
        assert_eq!(derive_title("Title\rMore\nX"), "Title");
        assert_eq!(derive_title("Title\u{2028}More\nX"), "Title");
        assert_eq!(derive_title("Title\x0bMore. Yes\nX"), "Title");
    }

    #[test]
    fn lone_carriage_return_keeps_whole_text() {
        assert_eq!(derive_title("Title\rMore"), "Title\rMore");
    }

    #[test]
    fn empty_first_line_yields_empty_title() {
        assert_eq!(derive_title("\nSecond line"), "");
    }

    // === Date parsing ===

    #[test]
    fn parses_gmt_dates() {
        let dt = parse_pub_date("Mon, 01 Jan 2024 10:00:00 GMT").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn keeps_date_in_feed_offset() {
        let dt = parse_pub_date("Mon, 01 Jan 2024 23:30:00 -0800").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn parses_iso_dates() {
        let dt = parse_pub_date("2024-01-01T10:00:00+01:00").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn rejects_garbage_dates() {
        match parse_pub_date("yesterday") {
            Err(EpisodeError::InvalidDate { date_str, .. }) => assert_eq!(date_str, "yesterday"),
            other => panic!("Expected InvalidDate, got {:?}", other),
        }
    }

    // === Item validation ===

    #[test]
    fn from_item_extracts_all_fields() {
        let item = make_item(
            Some("abc123"),
            Some("Mon, 01 Jan 2024 10:00:00 GMT"),
            Some("Episode One. Extra text"),
        );

        let info = EpisodeInfo::from_item(&item).unwrap();

        assert_eq!(info.guid, "abc123");
        assert_eq!(info.title().unwrap(), "Episode One");
        assert_eq!(info.description.as_deref(), Some("Episode One. Extra text"));
        assert_eq!(
            info.published_date(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn from_item_requires_guid() {
        let item = make_item(None, Some("Mon, 01 Jan 2024 10:00:00 GMT"), Some("x"));
        assert!(matches!(
            EpisodeInfo::from_item(&item),
            Err(EpisodeError::MissingField { field: "guid" })
        ));
    }

    #[test]
    fn from_item_requires_pub_date() {
        let item = make_item(Some("g"), None, Some("x"));
        assert!(matches!(
            EpisodeInfo::from_item(&item),
            Err(EpisodeError::MissingField { field: "pubDate" })
        ));
    }

    #[test]
    fn from_item_accepts_missing_description() {
        let item = make_item(Some("g"), Some("Mon, 01 Jan 2024 10:00:00 GMT"), None);
        let info = EpisodeInfo::from_item(&item).unwrap();
        assert!(info.description.is_none());
    }

    #[test]
    fn title_requires_description() {
        let item = make_item(Some("g"), Some("Mon, 01 Jan 2024 10:00:00 GMT"), None);
        let info = EpisodeInfo::from_item(&item).unwrap();
        assert!(matches!(
            info.title(),
            Err(EpisodeError::MissingField {
                field: "description"
            })
        ));
    }
}
