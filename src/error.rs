use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("query parameter is required")]
    MissingQuery,

    #[error("X-User-ID header is required")]
    MissingUserId,

    #[error("incomplete favorite: {0} is required")]
    IncompleteFavorite(&'static str),

    #[error("movie {0} is already a favorite")]
    AlreadyFavorite(i64),

    #[error("favorite not found")]
    FavoriteNotFound,

    #[error("catalog request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("favorites storage failed: {0}")]
    Storage(#[from] std::io::Error),

    #[error("favorites store is corrupt: {0}")]
    CorruptState(#[from] serde_json::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::MissingQuery
            | AppError::MissingUserId
            | AppError::IncompleteFavorite(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyFavorite(_) => StatusCode::CONFLICT,
            AppError::FavoriteNotFound => StatusCode::NOT_FOUND,
            AppError::Upstream(_) | AppError::Storage(_) | AppError::CorruptState(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("{self}");
        } else {
            warn!("{self}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
