// src/pipeline/run.rs

//! One relay cycle: load, fetch, diff, deliver, save.

use chrono::NaiveDate;

use crate::models::{DeliveryConfig, DeliveryPolicy};
use crate::services::{ListingFetcher, Notifier};
use crate::storage::ArticleStore;

use super::diff::{new_articles, order_for_delivery};

/// How a cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The listing could not be fetched or had no articles
    NoListing,
    /// Every listed article was already processed
    NothingNew,
    /// New articles were sent
    Processed,
}

/// Summary of a relay cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub fetched: usize,
    pub new: usize,
    pub delivered: usize,
    pub failed: usize,
    /// Whether the state file was written successfully
    pub saved: bool,
}

impl RunSummary {
    fn empty(outcome: RunOutcome, fetched: usize) -> Self {
        Self {
            outcome,
            fetched,
            new: 0,
            delivered: 0,
            failed: 0,
            saved: false,
        }
    }
}

/// Run one relay cycle.
///
/// Nothing here escalates: fetch, send and save failures are logged and
/// reflected in the returned summary. The state file is written only when
/// at least one article was marked as processed.
pub async fn run_cycle(
    fetcher: &dyn ListingFetcher,
    notifier: &dyn Notifier,
    store: &dyn ArticleStore,
    delivery: &DeliveryConfig,
    today: NaiveDate,
) -> RunSummary {
    let mut processed = store.load().await;

    log::info!("Checking for news");
    let fetched = match fetcher.fetch_listing().await {
        Ok(articles) if !articles.is_empty() => articles,
        Ok(_) => {
            log::info!("No news found");
            return RunSummary::empty(RunOutcome::NoListing, 0);
        }
        Err(e) => {
            log::error!("Failed to fetch listing: {}", e);
            log::info!("No news found");
            return RunSummary::empty(RunOutcome::NoListing, 0);
        }
    };
    let fetched_count = fetched.len();

    let fresh = new_articles(&processed, fetched);
    if fresh.is_empty() {
        log::info!("No new news found");
        return RunSummary::empty(RunOutcome::NothingNew, fetched_count);
    }

    let fresh = order_for_delivery(fresh, delivery.ordering, today);
    let mut summary = RunSummary {
        outcome: RunOutcome::Processed,
        fetched: fetched_count,
        new: fresh.len(),
        delivered: 0,
        failed: 0,
        saved: false,
    };
    let mut appended = 0;

    for article in fresh {
        let delivered = match notifier.notify(&article.link).await {
            Ok(()) => {
                log::info!("Sent news: {}", article.link);
                summary.delivered += 1;
                true
            }
            Err(e) => {
                log::error!("Failed to send {}: {}", article.link, e);
                summary.failed += 1;
                false
            }
        };

        let mark_seen = match delivery.policy {
            DeliveryPolicy::AtMostOnce => true,
            DeliveryPolicy::AtLeastOnce => delivered,
        };
        if mark_seen && processed.insert(article) {
            appended += 1;
        }
    }

    if appended > 0 {
        match store.save(&processed).await {
            Ok(()) => summary.saved = true,
            Err(e) => log::error!("Failed to save processed news: {}", e),
        }
    } else {
        log::warn!("No article was delivered, state left unchanged");
    }

    summary
}
