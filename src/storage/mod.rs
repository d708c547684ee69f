//! Storage abstractions for processed-article persistence.
//!
//! The processed set is kept as a single JSON array on disk:
//!
//! ```text
//! processed_news.json   # every forwarded article, oldest first
//! processed_news.lock   # held while a run is in progress
//! ```

pub mod local;
pub mod lock;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ProcessedSet;

// Re-export for convenience
pub use local::LocalStorage;
pub use lock::RunLock;

/// Trait for processed-set storage backends.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Load the processed set.
    ///
    /// Never fails: a missing backing file yields an empty set, and an
    /// unreadable or malformed one is logged and also yields an empty set.
    async fn load(&self) -> ProcessedSet;

    /// Overwrite the backing file with the full set.
    async fn save(&self, processed: &ProcessedSet) -> Result<()>;
}
