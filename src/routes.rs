use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    enrich::enriched_search,
    error::AppError,
    favorites::NewFavorite,
    state::State as AppState,
};

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Deserialize)]
pub struct SearchParams {
    query: Option<String>,
    language: Option<String>,
}

pub async fn root_handler() -> impl IntoResponse {
    Json(json!({ "message": "Movie API up" }))
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.query.as_deref().unwrap_or_default();
    let user_id = user_id(&headers).ok();

    let response = enriched_search(
        state.catalog.as_ref(),
        &state.favorites,
        query,
        params.language.as_deref(),
        user_id.as_deref(),
    )
    .await?;

    Ok(Json(response))
}

pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user_id = user_id(&headers)?;

    Ok(Json(state.favorites.list(&user_id).await?))
}

pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(new): Json<NewFavorite>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = user_id(&headers)?;

    let record = state.favorites.add(&user_id, new).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(tmdb_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = user_id(&headers)?;

    state.favorites.remove(&user_id, tmdb_id).await?;

    Ok(Json(json!({ "message": "Movie removed from favorites" })))
}

fn user_id(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(AppError::MissingUserId)
}
