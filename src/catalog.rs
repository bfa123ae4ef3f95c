//! # Catalog proxy
//!
//! The external movie catalog (TMDB) is queried server-side so the API key
//! never reaches the browser. The response body is passed through to the
//! client structurally unmodified: only the `results` items are pulled out
//! for enrichment, every other top-level field rides along untouched.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{config::Config, error::AppError};

/// A catalog page as TMDB returns it. `results` items stay as raw JSON maps
/// so unknown catalog fields survive the round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<Map<String, Value>>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn search(
        &self,
        query: &str,
        language: Option<&str>,
    ) -> Result<SearchResponse, AppError>;
}

pub struct TmdbClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.tmdb_api_url.clone(),
            api_key: config.tmdb_api_key.clone(),
        }
    }
}

#[async_trait]
impl Catalog for TmdbClient {
    async fn search(
        &self,
        query: &str,
        language: Option<&str>,
    ) -> Result<SearchResponse, AppError> {
        if query.trim().is_empty() {
            return Err(AppError::MissingQuery);
        }

        let mut request = self
            .http
            .get(format!("{}/search/movie", self.base_url))
            .query(&[("api_key", self.api_key.as_str()), ("query", query)]);

        if let Some(language) = language {
            request = request.query(&[("language", language)]);
        }

        let response = request.send().await?.error_for_status()?;

        Ok(response.json().await?)
    }
}
