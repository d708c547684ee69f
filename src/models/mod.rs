// src/models/mod.rs

//! Domain models for the relay application.

mod article;
mod config;
mod selectors;

// Re-export all public types
pub use article::{ArticleRecord, ProcessedSet};
pub use config::{
    Config, DeliveryConfig, DeliveryPolicy, HttpConfig, ListingConfig, LoggingConfig,
    StorageConfig, TelegramConfig, TimeOrdering,
};
pub use selectors::{CompiledSelectors, ListingSelectors};
