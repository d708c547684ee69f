// src/models/selectors.rs

//! CSS selectors for scraping the listing page.

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// CSS selectors for scraping the listing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingSelectors {
    /// Selector for each article card on the page
    #[serde(default = "default_card_selector")]
    pub card_selector: String,

    /// Selector for the element carrying the article link, within a card
    #[serde(default = "default_pubdate_selector")]
    pub link_selector: String,

    /// Selector for the element carrying the publication time, within a card
    #[serde(default = "default_pubdate_selector")]
    pub time_selector: String,

    /// HTML attribute name for extracting links (usually "href")
    #[serde(default = "default_attr_name")]
    pub attr_name: String,
}

fn default_card_selector() -> String {
    "article.post-card".to_string()
}

fn default_pubdate_selector() -> String {
    "a.post-card__pubdate".to_string()
}

fn default_attr_name() -> String {
    "href".to_string()
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            card_selector: default_card_selector(),
            link_selector: default_pubdate_selector(),
            time_selector: default_pubdate_selector(),
            attr_name: default_attr_name(),
        }
    }
}

/// Parsed form of [`ListingSelectors`].
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub card: Selector,
    pub link: Selector,
    pub time: Selector,
    pub attr_name: String,
}

impl ListingSelectors {
    /// Parse every selector string.
    pub fn compile(&self) -> Result<CompiledSelectors> {
        Ok(CompiledSelectors {
            card: parse_selector(&self.card_selector)?,
            link: parse_selector(&self.link_selector)?,
            time: parse_selector(&self.time_selector)?,
            attr_name: self.attr_name.clone(),
        })
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
