//! # Client
//!
//! The browser side of the app, minus rendering: a persistent
//! client-generated identity, an HTTP client for the four endpoints, and the
//! view state machine a UI drives. The UI has two views, the search grid and
//! the favorites list, toggled by a single action. Entering the favorites
//! view re-syncs the list from the server; favoriting a card flips its flag
//! optimistically and rolls back if the server rejects the change.

use std::path::Path;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::store::FavoriteRecord;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server rejected the request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("could not persist user identity: {0}")]
    Identity(#[from] std::io::Error),
}

/// A search result as the backend returns it, flag included.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichedMovie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(rename = "isFavorite", default)]
    pub is_favorite: bool,
}

#[derive(Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<EnrichedMovie>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Loads the user id from the profile file, generating and persisting one on
/// first use. The browser-localStorage analog: one id per profile, created
/// once, never validated by the server.
pub fn load_or_create_user_id(path: &Path) -> Result<String, ClientError> {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let existing = existing.trim();
        if !existing.is_empty() {
            return Ok(existing.to_string());
        }
    }

    let user_id = format!("user_{}", Uuid::new_v4().simple());
    std::fs::write(path, &user_id)?;

    Ok(user_id)
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    user_id: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            user_id: user_id.into(),
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<EnrichedMovie>, ClientError> {
        let response = self
            .http
            .get(format!("{}/movies/search", self.base_url))
            .query(&[("query", query)])
            .header("X-User-ID", &self.user_id)
            .send()
            .await?;

        Ok(checked(response).await?.json::<SearchPage>().await?.results)
    }

    pub async fn favorites(&self) -> Result<Vec<FavoriteRecord>, ClientError> {
        let response = self
            .http
            .get(format!("{}/movies/favorites", self.base_url))
            .header("X-User-ID", &self.user_id)
            .send()
            .await?;

        Ok(checked(response).await?.json().await?)
    }

    pub async fn add_favorite(&self, movie: &EnrichedMovie) -> Result<FavoriteRecord, ClientError> {
        let response = self
            .http
            .post(format!("{}/movies/favorites", self.base_url))
            .header("X-User-ID", &self.user_id)
            .json(&json!({
                "tmdb_id": movie.id,
                "title": movie.title,
                "rating": movie.vote_average,
                "poster_path": movie.poster_path,
            }))
            .send()
            .await?;

        Ok(checked(response).await?.json().await?)
    }

    pub async fn remove_favorite(&self, tmdb_id: i64) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(format!("{}/movies/favorites/{tmdb_id}", self.base_url))
            .header("X-User-ID", &self.user_id)
            .send()
            .await?;

        checked(response).await?;

        Ok(())
    }
}

async fn checked(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };

    Err(ClientError::Rejected { status, message })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Browsing,
    ViewingFavorites,
}

pub struct MovieApp {
    api: ApiClient,
    view: ViewState,
    results: Vec<EnrichedMovie>,
    favorites: Vec<FavoriteRecord>,
}

impl MovieApp {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            view: ViewState::Browsing,
            results: Vec::new(),
            favorites: Vec::new(),
        }
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn results(&self) -> &[EnrichedMovie] {
        &self.results
    }

    pub fn favorites(&self) -> &[FavoriteRecord] {
        &self.favorites
    }

    pub async fn search(&mut self, query: &str) -> Result<(), ClientError> {
        self.results = self.api.search(query).await?;

        Ok(())
    }

    /// Switches between the search grid and the favorites list. Entering the
    /// favorites view re-fetches from the server; if that fails the view
    /// stays where it was.
    pub async fn toggle_view(&mut self) -> Result<(), ClientError> {
        self.view = match self.view {
            ViewState::Browsing => {
                self.favorites = self.api.favorites().await?;
                ViewState::ViewingFavorites
            }
            ViewState::ViewingFavorites => ViewState::Browsing,
        };

        Ok(())
    }

    /// Flips a result card's membership. The flag is updated before the
    /// request goes out so the UI responds immediately; a server rejection
    /// rolls it back.
    pub async fn toggle_favorite(&mut self, tmdb_id: i64) -> Result<(), ClientError> {
        let Some(index) = self.results.iter().position(|m| m.id == tmdb_id) else {
            return Ok(());
        };

        let was_favorite = self.results[index].is_favorite;
        self.results[index].is_favorite = !was_favorite;

        let outcome = if was_favorite {
            self.api.remove_favorite(tmdb_id).await
        } else {
            let movie = self.results[index].clone();
            self.api.add_favorite(&movie).await.map(|_| ())
        };

        if let Err(e) = outcome {
            self.results[index].is_favorite = was_favorite;
            return Err(e);
        }

        Ok(())
    }
}
