//! Annotates catalog search results with per-user favorite membership.

use std::collections::HashSet;

use serde_json::Value;

use crate::{
    catalog::{Catalog, SearchResponse},
    error::AppError,
    favorites::FavoritesService,
};

/// Runs a catalog search and sets `isFavorite` on every result item. Without
/// a user id the flag is `false` across the board. Ordering is whatever the
/// catalog returned.
pub async fn enriched_search(
    catalog: &dyn Catalog,
    favorites: &FavoritesService,
    query: &str,
    language: Option<&str>,
    user_id: Option<&str>,
) -> Result<SearchResponse, AppError> {
    let mut response = catalog.search(query, language).await?;

    let favored: HashSet<i64> = match user_id {
        Some(user_id) => favorites
            .list(user_id)
            .await?
            .iter()
            .map(|f| f.tmdb_id)
            .collect(),
        None => HashSet::new(),
    };

    for item in &mut response.results {
        let is_favorite = item
            .get("id")
            .and_then(Value::as_i64)
            .is_some_and(|id| favored.contains(&id));

        item.insert("isFavorite".to_string(), Value::Bool(is_favorite));
    }

    Ok(response)
}
