//! Favorites persistence.
//!
//! The whole favorites state is one JSON document, a map from user id to that
//! user's favorite list. The document is created lazily on first read and
//! rewritten in full on every mutation, there are no partial updates.

use std::{collections::HashMap, io::ErrorKind, path::PathBuf, sync::Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub tmdb_id: i64,
    pub title: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Set once at creation, never mutated.
    #[serde(rename = "addDate")]
    pub add_date: DateTime<Utc>,
}

/// User id -> ordered favorite list. Within one user's list, `tmdb_id`
/// values are unique; insertion order is display order only.
pub type FavoritesDocument = HashMap<String, Vec<FavoriteRecord>>;

#[async_trait]
pub trait FavoritesStore: Send + Sync {
    async fn read(&self) -> Result<FavoritesDocument, AppError>;
    async fn write(&self, doc: &FavoritesDocument) -> Result<(), AppError>;
}

/// Flat-file store holding the favorites document at a fixed path.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FavoritesStore for JsonFileStore {
    async fn read(&self) -> Result<FavoritesDocument, AppError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No favorites file at {:?}, initializing empty", self.path);
                let doc = FavoritesDocument::new();
                self.write(&doc).await?;
                return Ok(doc);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write(&self, doc: &FavoritesDocument) -> Result<(), AppError> {
        let bytes = serde_json::to_vec_pretty(doc)?;
        fs::write(&self.path, bytes).await?;

        Ok(())
    }
}

/// In-memory store, substituted for the file store in tests.
#[derive(Default)]
pub struct MemoryStore {
    doc: Mutex<FavoritesDocument>,
}

#[async_trait]
impl FavoritesStore for MemoryStore {
    async fn read(&self) -> Result<FavoritesDocument, AppError> {
        Ok(self.doc.lock().unwrap().clone())
    }

    async fn write(&self, doc: &FavoritesDocument) -> Result<(), AppError> {
        *self.doc.lock().unwrap() = doc.clone();

        Ok(())
    }
}
