//! Local filesystem storage implementation.
//!
//! Keeps the processed set in one JSON file. Writes go to a sibling temp
//! file which is then renamed over the original, so a crash mid-write
//! leaves the previous state intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::ProcessedSet;
use crate::storage::ArticleStore;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage backed by the given JSON file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(&bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match self.read_bytes().await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ArticleStore for LocalStorage {
    async fn load(&self) -> ProcessedSet {
        match self.read_json::<ProcessedSet>().await {
            Ok(Some(processed)) => {
                log::debug!(
                    "Loaded {} processed articles from {}",
                    processed.len(),
                    self.path.display()
                );
                processed
            }
            Ok(None) => {
                log::info!("No state file at {}, starting empty", self.path.display());
                ProcessedSet::new()
            }
            Err(e) => {
                log::error!(
                    "Failed to load processed articles from {}: {}",
                    self.path.display(),
                    e
                );
                ProcessedSet::new()
            }
        }
    }

    async fn save(&self, processed: &ProcessedSet) -> Result<()> {
        self.write_json(processed).await?;
        log::debug!(
            "Saved {} processed articles to {}",
            processed.len(),
            self.path.display()
        );
        Ok(())
    }
}
