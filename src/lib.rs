//! # Movies
//!
//! Movie search with per-user favorites.
//!
//! The backend proxies search queries to the TMDB catalog so the API key
//! stays server-side, annotates each result with an `isFavorite` flag for
//! the requesting user, and persists favorites to a flat JSON file keyed by
//! a client-generated user id sent in the `X-User-ID` header.
//!
//!
//!
//! # Endpoints
//!
//! - `GET /` — liveness message
//! - `GET /movies/search?query=&language=` — proxied catalog search,
//!   enriched when `X-User-ID` is present
//! - `GET /movies/favorites` — the caller's favorites
//! - `POST /movies/favorites` — add a favorite, `201` / `400` / `409`
//! - `DELETE /movies/favorites/{tmdb_id}` — remove a favorite, `400` / `404`
//!
//!
//!
//! # Environment
//!
//! - `TMDB_API_KEY` — catalog credential, required
//! - `PORT` — listen port, default `3001`
//! - `TMDB_API_URL` — catalog base URL, default `https://api.themoviedb.org/3`
//! - `FAVORITES_PATH` — favorites file location, default `favorites.json`
//!
//! Identity is whatever the client sends: an opaque, unauthenticated string
//! used purely as a storage partition key. Collisions between clients are
//! possible and unhandled.

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderName, Method, header::CONTENT_TYPE},
    routing::{delete, get},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod catalog;
pub mod client;
pub mod config;
pub mod enrich;
pub mod error;
pub mod favorites;
pub mod routes;
pub mod state;
pub mod store;

use routes::{
    USER_ID_HEADER, add_favorite, list_favorites, remove_favorite, root_handler, search_handler,
};
use state::State;

pub fn router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(root_handler))
        .route("/movies/search", get(search_handler))
        .route("/movies/favorites", get(list_favorites).post(add_favorite))
        .route("/movies/favorites/{tmdb_id}", delete(remove_favorite))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new();

    info!("Starting server...");
    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
