// src/services/listing.rs

//! Listing page fetcher.
//!
//! Downloads the listing page and extracts one [`ArticleRecord`] per article
//! card using the configured CSS selectors.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ArticleRecord, CompiledSelectors, ListingConfig};
use crate::utils::{absolutize_link, get_domain, http};

/// Source of the current listing.
#[async_trait]
pub trait ListingFetcher: Send + Sync {
    /// Fetch the listing and return its articles in page order.
    ///
    /// A page with no extractable articles is an error, same as a network
    /// failure or a non-2xx status.
    async fn fetch_listing(&self) -> Result<Vec<ArticleRecord>>;
}

/// Fetches the listing over HTTP.
pub struct HttpListingFetcher {
    client: Client,
    url: Url,
    selectors: CompiledSelectors,
}

impl HttpListingFetcher {
    /// Create a fetcher for the configured listing page.
    pub fn new(client: Client, config: &ListingConfig) -> Result<Self> {
        Ok(Self {
            client,
            url: Url::parse(&config.url)?,
            selectors: config.selectors.compile()?,
        })
    }
}

#[async_trait]
impl ListingFetcher for HttpListingFetcher {
    async fn fetch_listing(&self) -> Result<Vec<ArticleRecord>> {
        log::debug!(
            "Fetching listing from {}",
            get_domain(self.url.as_str()).unwrap_or_else(|| self.url.to_string())
        );

        let html = http::fetch_text(&self.client, self.url.as_str()).await?;
        let articles = extract_articles(&html, &self.url, &self.selectors);

        if articles.is_empty() {
            return Err(AppError::EmptyListing(self.url.to_string()));
        }

        log::info!("Found {} articles on the listing page", articles.len());
        Ok(articles)
    }
}

/// Extract article records from listing markup, in document order.
///
/// Cards without a usable link or display time are skipped and logged;
/// they never stop the remaining cards from being extracted.
pub fn extract_articles(
    html: &str,
    base_url: &Url,
    selectors: &CompiledSelectors,
) -> Vec<ArticleRecord> {
    let document = Html::parse_document(html);
    let mut articles = Vec::new();

    for (index, card) in document.select(&selectors.card).enumerate() {
        match parse_card(&card, base_url, selectors) {
            Ok(article) => articles.push(article),
            Err(reason) => log::warn!("Skipping article card #{}: {}", index + 1, reason),
        }
    }

    articles
}

fn parse_card(
    card: &ElementRef,
    base_url: &Url,
    selectors: &CompiledSelectors,
) -> std::result::Result<ArticleRecord, String> {
    let link_elem = card
        .select(&selectors.link)
        .next()
        .ok_or("no link element")?;
    let time_elem = card
        .select(&selectors.time)
        .next()
        .ok_or("no time element")?;

    let href = link_elem
        .value()
        .attr(&selectors.attr_name)
        .ok_or_else(|| format!("link element has no '{}' attribute", selectors.attr_name))?;
    let link = absolutize_link(base_url, href).ok_or_else(|| format!("unusable link '{href}'"))?;

    let raw_time: String = time_elem.text().collect();
    let published_time = raw_time.split_whitespace().collect::<Vec<_>>().join(" ");
    if published_time.is_empty() {
        return Err(format!("empty publication time for {link}"));
    }

    Ok(ArticleRecord {
        link,
        published_time,
    })
}
