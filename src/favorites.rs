//! Business operations over the favorites store.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    error::AppError,
    store::{FavoriteRecord, FavoritesStore},
};

/// Request body for adding a favorite. Required fields are optional here so
/// absence maps to a 400 instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct NewFavorite {
    pub tmdb_id: Option<i64>,
    pub title: Option<String>,
    pub rating: Option<f64>,
    pub poster_path: Option<String>,
}

pub struct FavoritesService {
    store: Arc<dyn FavoritesStore>,
    // Mutations are read-modify-write cycles over the whole document.
    // Serializing them through one lock keeps concurrent requests from
    // overwriting each other's writes.
    write_lock: Mutex<()>,
}

impl FavoritesService {
    pub fn new(store: Arc<dyn FavoritesStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<FavoriteRecord>, AppError> {
        if user_id.is_empty() {
            return Err(AppError::MissingUserId);
        }

        let doc = self.store.read().await?;

        Ok(doc.get(user_id).cloned().unwrap_or_default())
    }

    pub async fn add(&self, user_id: &str, new: NewFavorite) -> Result<FavoriteRecord, AppError> {
        if user_id.is_empty() {
            return Err(AppError::MissingUserId);
        }
        let tmdb_id = new.tmdb_id.ok_or(AppError::IncompleteFavorite("tmdb_id"))?;
        let title = new
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(AppError::IncompleteFavorite("title"))?;

        let _guard = self.write_lock.lock().await;

        let mut doc = self.store.read().await?;
        let favorites = doc.entry(user_id.to_string()).or_default();

        if favorites.iter().any(|f| f.tmdb_id == tmdb_id) {
            return Err(AppError::AlreadyFavorite(tmdb_id));
        }

        let record = FavoriteRecord {
            tmdb_id,
            title,
            rating: new.rating.unwrap_or(0.0),
            poster_path: new.poster_path,
            add_date: Utc::now(),
        };
        favorites.push(record.clone());

        self.store.write(&doc).await?;

        Ok(record)
    }

    pub async fn remove(&self, user_id: &str, tmdb_id: i64) -> Result<(), AppError> {
        if user_id.is_empty() {
            return Err(AppError::MissingUserId);
        }

        let _guard = self.write_lock.lock().await;

        let mut doc = self.store.read().await?;
        let favorites = doc.get_mut(user_id).ok_or(AppError::FavoriteNotFound)?;

        // Unconditional filter: every matching record goes, even if the
        // uniqueness invariant was violated by an earlier storage bug.
        let before = favorites.len();
        favorites.retain(|f| f.tmdb_id != tmdb_id);

        if favorites.len() == before {
            return Err(AppError::FavoriteNotFound);
        }

        self.store.write(&doc).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FavoritesDocument, MemoryStore};

    fn service() -> FavoritesService {
        FavoritesService::new(Arc::new(MemoryStore::default()))
    }

    fn new_favorite(tmdb_id: i64, title: &str) -> NewFavorite {
        NewFavorite {
            tmdb_id: Some(tmdb_id),
            title: Some(title.to_string()),
            rating: None,
            poster_path: None,
        }
    }

    #[tokio::test]
    async fn unseen_user_has_empty_list() {
        let favorites = service();

        assert!(favorites.list("user_never_seen").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn added_favorite_shows_up_in_list() {
        let favorites = service();

        let record = favorites.add("u1", new_favorite(550, "Fight Club")).await.unwrap();
        assert_eq!(record.tmdb_id, 550);
        assert_eq!(record.rating, 0.0);
        assert_eq!(record.poster_path, None);

        let listed = favorites.list("u1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].tmdb_id, 550);
        assert_eq!(listed[0].title, "Fight Club");
    }

    #[tokio::test]
    async fn duplicate_add_is_rejected_and_list_unchanged() {
        let favorites = service();

        favorites.add("u1", new_favorite(550, "Fight Club")).await.unwrap();
        let err = favorites
            .add("u1", new_favorite(550, "Fight Club"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AlreadyFavorite(550)));
        assert_eq!(favorites.list("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn same_movie_can_be_favorited_by_different_users() {
        let favorites = service();

        favorites.add("u1", new_favorite(550, "Fight Club")).await.unwrap();
        favorites.add("u2", new_favorite(550, "Fight Club")).await.unwrap();

        assert_eq!(favorites.list("u1").await.unwrap().len(), 1);
        assert_eq!(favorites.list("u2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let favorites = service();

        let err = favorites
            .add(
                "u1",
                NewFavorite {
                    tmdb_id: None,
                    title: Some("Film".to_string()),
                    rating: None,
                    poster_path: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::IncompleteFavorite("tmdb_id")));

        let err = favorites
            .add(
                "u1",
                NewFavorite {
                    tmdb_id: Some(1),
                    title: Some("   ".to_string()),
                    rating: None,
                    poster_path: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::IncompleteFavorite("title")));

        let err = favorites.add("", new_favorite(1, "Film")).await.unwrap_err();
        assert!(matches!(err, AppError::MissingUserId));
    }

    #[tokio::test]
    async fn remove_deletes_the_record() {
        let favorites = service();

        favorites.add("u1", new_favorite(550, "Fight Club")).await.unwrap();
        favorites.add("u1", new_favorite(603, "The Matrix")).await.unwrap();

        favorites.remove("u1", 550).await.unwrap();

        let listed = favorites.list("u1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].tmdb_id, 603);
    }

    #[tokio::test]
    async fn remove_of_absent_record_or_user_is_not_found() {
        let favorites = service();

        let err = favorites.remove("u_unknown", 550).await.unwrap_err();
        assert!(matches!(err, AppError::FavoriteNotFound));

        favorites.add("u1", new_favorite(550, "Fight Club")).await.unwrap();
        let err = favorites.remove("u1", 999).await.unwrap_err();
        assert!(matches!(err, AppError::FavoriteNotFound));
    }

    #[tokio::test]
    async fn remove_drops_every_match_when_invariant_was_violated() {
        // A duplicate id can only appear through a storage-layer bug; remove
        // still clears all of them.
        let store = Arc::new(MemoryStore::default());
        let mut doc = FavoritesDocument::new();
        let dup = FavoriteRecord {
            tmdb_id: 550,
            title: "Fight Club".to_string(),
            rating: 0.0,
            poster_path: None,
            add_date: Utc::now(),
        };
        doc.insert("u1".to_string(), vec![dup.clone(), dup]);
        store.write(&doc).await.unwrap();

        let favorites = FavoritesService::new(store);
        favorites.remove("u1", 550).await.unwrap();

        assert!(favorites.list("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rating_and_poster_are_kept_when_given() {
        let favorites = service();

        let record = favorites
            .add(
                "u1",
                NewFavorite {
                    tmdb_id: Some(550),
                    title: Some("Fight Club".to_string()),
                    rating: Some(8.4),
                    poster_path: Some("/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(record.rating, 8.4);
        assert_eq!(
            record.poster_path.as_deref(),
            Some("/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg")
        );
    }
}
