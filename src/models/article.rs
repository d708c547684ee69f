//! Article records and the processed set.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// An article entry extracted from the listing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Absolute URL to the article, unique key
    pub link: String,

    /// Publication time as displayed on the page
    #[serde(rename = "time")]
    pub published_time: String,
}

/// Date-time layouts seen on listing pages, tried in order.
const DATE_TIME_FORMATS: &[&str] = &[
    "%d.%m.%Y %H:%M",
    "%d.%m.%Y, %H:%M",
    "%d.%m.%Y в %H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%Y-%m-%d"];

impl ArticleRecord {
    pub fn new(link: impl Into<String>, published_time: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            published_time: published_time.into(),
        }
    }

    /// Interpret the display time as a timestamp.
    ///
    /// A bare `HH:MM` is taken as `today`. Leading "сегодня"/"today" and
    /// "вчера"/"yesterday" words shift the date accordingly. Returns `None`
    /// when no known layout matches.
    pub fn published_at(&self, today: NaiveDate) -> Option<NaiveDateTime> {
        let text = self.published_time.trim();
        if text.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.naive_local());
        }

        let (day, rest) = split_relative_day(text, today);
        if let Some(time) = parse_time(rest) {
            return Some(day.and_time(time));
        }
        if rest.len() != text.len() {
            // a relative day word followed by something that isn't a time
            return None;
        }

        DATE_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .ok()
}

/// Strip a leading relative-day word, returning the day it refers to.
fn split_relative_day(text: &str, today: NaiveDate) -> (NaiveDate, &str) {
    let lower = text.to_lowercase();
    for (word, offset) in [("сегодня", 0), ("today", 0), ("вчера", 1), ("yesterday", 1)] {
        if lower.starts_with(word) {
            // lowercase of these words keeps byte length
            let Some(rest) = text.get(word.len()..) else {
                continue;
            };
            let rest = rest
                .trim_start_matches(|c: char| c == ',' || c.is_whitespace())
                .trim_start_matches("в ")
                .trim_start_matches("at ")
                .trim();
            return (today - Duration::days(offset), rest);
        }
    }
    (today, text)
}

/// Every article already forwarded, in delivery order.
///
/// Append-only. Keeps a link index alongside the records so membership
/// checks don't scan the history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ArticleRecord>", into = "Vec<ArticleRecord>")]
pub struct ProcessedSet {
    records: Vec<ArticleRecord>,
    links: HashSet<String>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an article with this link was already processed.
    pub fn contains(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    /// Append a record. Returns `false` if its link is already present.
    pub fn insert(&mut self, record: ArticleRecord) -> bool {
        if !self.links.insert(record.link.clone()) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&ArticleRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<ArticleRecord>> for ProcessedSet {
    fn from(records: Vec<ArticleRecord>) -> Self {
        let mut set = Self::new();
        for record in records {
            set.insert(record);
        }
        set
    }
}

impl From<ProcessedSet> for Vec<ArticleRecord> {
    fn from(set: ProcessedSet) -> Self {
        set.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_serializes_time_field() {
        let record = ArticleRecord::new("https://example.com/a", "09:15");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"link":"https://example.com/a","time":"09:15"}"#);
    }

    #[test]
    fn test_published_at_time_only() {
        let record = ArticleRecord::new("https://example.com/a", "09:15");
        assert_eq!(record.published_at(today()), Some(at(2026, 3, 14, 9, 15)));
    }

    #[test]
    fn test_published_at_relative_days() {
        let record = ArticleRecord::new("x", "Вчера в 23:40");
        assert_eq!(record.published_at(today()), Some(at(2026, 3, 13, 23, 40)));

        let record = ArticleRecord::new("x", "сегодня, 07:05");
        assert_eq!(record.published_at(today()), Some(at(2026, 3, 14, 7, 5)));

        let record = ArticleRecord::new("x", "вчера");
        assert_eq!(record.published_at(today()), None);
    }

    #[test]
    fn test_published_at_full_dates() {
        let record = ArticleRecord::new("x", "02.03.2026 18:00");
        assert_eq!(record.published_at(today()), Some(at(2026, 3, 2, 18, 0)));

        let record = ArticleRecord::new("x", "2026-01-31");
        assert_eq!(record.published_at(today()), Some(at(2026, 1, 31, 0, 0)));
    }

    #[test]
    fn test_published_at_iso_without_offset() {
        let record = ArticleRecord::new("x", "2026-03-10T08:15:00");
        assert_eq!(record.published_at(today()), Some(at(2026, 3, 10, 8, 15)));

        let record = ArticleRecord::new("x", "2026-03-10T21:05");
        assert_eq!(record.published_at(today()), Some(at(2026, 3, 10, 21, 5)));
    }

    #[test]
    fn test_published_at_unknown_format() {
        let record = ArticleRecord::new("x", "5 минут назад");
        assert_eq!(record.published_at(today()), None);
    }

    #[test]
    fn test_processed_set_rejects_duplicate_links() {
        let mut set = ProcessedSet::new();
        assert!(set.insert(ArticleRecord::new("https://example.com/a", "09:00")));
        assert!(!set.insert(ArticleRecord::new("https://example.com/a", "10:00")));
        assert_eq!(set.len(), 1);
        assert_eq!(set.records()[0].published_time, "09:00");
        assert!(set.contains("https://example.com/a"));
    }

    #[test]
    fn test_processed_set_json_is_plain_array() {
        let set = ProcessedSet::from(vec![
            ArticleRecord::new("https://example.com/a", "09:00"),
            ArticleRecord::new("https://example.com/b", "Вчера"),
        ]);
        let json = serde_json::to_string(&set).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("Вчера"));

        let back: ProcessedSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
