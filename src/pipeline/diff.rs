//! Diff calculation and delivery ordering.
//!
//! Finds the fetched articles that were never forwarded and orders them
//! oldest first.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{ArticleRecord, ProcessedSet, TimeOrdering};

/// Fetched articles whose link is not in `processed`, in page order.
///
/// A link listed twice on the page is kept once (first occurrence).
pub fn new_articles(processed: &ProcessedSet, fetched: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    let mut seen = HashSet::new();
    fetched
        .into_iter()
        .filter(|article| !processed.contains(&article.link))
        .filter(|article| seen.insert(article.link.clone()))
        .collect()
}

/// Order new articles for delivery, oldest first.
///
/// Articles are sorted newest first (stable) and the result reversed, so
/// articles sharing a time come out in reverse page order.
///
/// With [`TimeOrdering::Chronological`] the display times are parsed as
/// timestamps; if any of them can't be parsed the whole batch is compared
/// as plain strings instead.
pub fn order_for_delivery(
    articles: Vec<ArticleRecord>,
    ordering: TimeOrdering,
    today: NaiveDate,
) -> Vec<ArticleRecord> {
    match ordering {
        TimeOrdering::Lexicographic => by_display_time(articles),
        TimeOrdering::Chronological => {
            let parsed: Option<Vec<NaiveDateTime>> =
                articles.iter().map(|a| a.published_at(today)).collect();

            match parsed {
                Some(stamps) => {
                    let keyed = stamps.into_iter().zip(articles).collect();
                    newest_first_reversed(keyed)
                }
                None => {
                    log::debug!("Unrecognized publication time, ordering by display text");
                    by_display_time(articles)
                }
            }
        }
    }
}

fn by_display_time(articles: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    let keyed = articles
        .into_iter()
        .map(|a| (a.published_time.clone(), a))
        .collect();
    newest_first_reversed(keyed)
}

fn newest_first_reversed<K: Ord>(mut keyed: Vec<(K, ArticleRecord)>) -> Vec<ArticleRecord> {
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    keyed.into_iter().rev().map(|(_, article)| article).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: u32, time: &str) -> ArticleRecord {
        ArticleRecord::new(format!("https://example.com/blog/{id}"), time)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn times(articles: &[ArticleRecord]) -> Vec<&str> {
        articles.iter().map(|a| a.published_time.as_str()).collect()
    }

    #[test]
    fn test_no_changes() {
        let fetched = vec![article(1, "09:00"), article(2, "09:10")];
        let processed = ProcessedSet::from(fetched.clone());

        assert!(new_articles(&processed, fetched).is_empty());
    }

    #[test]
    fn test_additions() {
        let processed = ProcessedSet::from(vec![article(1, "09:00")]);
        let fetched = vec![article(3, "09:20"), article(1, "09:00"), article(2, "09:10")];

        let added = new_articles(&processed, fetched);
        assert_eq!(added, vec![article(3, "09:20"), article(2, "09:10")]);
    }

    #[test]
    fn test_duplicate_links_on_page_kept_once() {
        let processed = ProcessedSet::new();
        let fetched = vec![article(1, "09:00"), article(1, "09:05"), article(2, "09:10")];

        let added = new_articles(&processed, fetched);
        assert_eq!(added, vec![article(1, "09:00"), article(2, "09:10")]);
    }

    #[test]
    fn test_empty_to_full() {
        let fetched = vec![article(1, "09:00")];
        assert_eq!(new_articles(&ProcessedSet::new(), fetched.clone()), fetched);
    }

    #[test]
    fn test_delivery_order_is_ascending() {
        let fresh = vec![article(1, "09:00"), article(2, "08:30"), article(3, "09:15")];

        for ordering in [TimeOrdering::Lexicographic, TimeOrdering::Chronological] {
            let ordered = order_for_delivery(fresh.clone(), ordering, today());
            assert_eq!(times(&ordered), vec!["08:30", "09:00", "09:15"]);
        }
    }

    #[test]
    fn test_equal_times_come_out_in_reverse_page_order() {
        let fresh = vec![article(1, "09:00"), article(2, "09:00"), article(3, "08:00")];

        let ordered = order_for_delivery(fresh, TimeOrdering::Lexicographic, today());
        let links: Vec<_> = ordered.iter().map(|a| a.link.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "https://example.com/blog/3",
                "https://example.com/blog/2",
                "https://example.com/blog/1",
            ]
        );
    }

    #[test]
    fn test_chronological_handles_mixed_formats() {
        // "9:05" sorts after "10:00" as text
        let fresh = vec![
            article(1, "10:00"),
            article(2, "9:05"),
            article(3, "Вчера в 23:50"),
            article(4, "01.03.2026 12:00"),
        ];

        let ordered = order_for_delivery(fresh, TimeOrdering::Chronological, today());
        assert_eq!(
            times(&ordered),
            vec!["01.03.2026 12:00", "Вчера в 23:50", "9:05", "10:00"]
        );
    }

    #[test]
    fn test_chronological_accepts_iso_without_offset() {
        let fresh = vec![
            article(1, "10:00"),
            article(2, "2026-03-13T22:00:00"),
            article(3, "9:05"),
        ];

        let ordered = order_for_delivery(fresh, TimeOrdering::Chronological, today());
        assert_eq!(times(&ordered), vec!["2026-03-13T22:00:00", "9:05", "10:00"]);
    }

    #[test]
    fn test_chronological_falls_back_to_text() {
        let fresh = vec![article(1, "b"), article(2, "10:00"), article(3, "a")];

        let ordered = order_for_delivery(fresh, TimeOrdering::Chronological, today());
        assert_eq!(times(&ordered), vec!["10:00", "a", "b"]);
    }
}
