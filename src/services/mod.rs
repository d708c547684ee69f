//! Service layer for the relay application.
//!
//! This module contains the I/O-facing parts of a run:
//! - Listing fetching and extraction (`HttpListingFetcher`)
//! - Message delivery (`TelegramNotifier`, `LogNotifier`)

mod listing;
mod telegram;

pub use listing::{HttpListingFetcher, ListingFetcher, extract_articles};
pub use telegram::{LogNotifier, Notifier, TelegramNotifier};
