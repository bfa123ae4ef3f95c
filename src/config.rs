use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub tmdb_api_key: String,
    pub tmdb_api_url: String,
    pub favorites_path: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", "3001"),
            tmdb_api_key: require("TMDB_API_KEY"),
            tmdb_api_url: try_load("TMDB_API_URL", "https://api.themoviedb.org/3"),
            favorites_path: try_load("FAVORITES_PATH", "favorites.json"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn require(key: &str) -> String {
    env::var(key)
        .map_err(|_| {
            warn!("Required environment variable {key} not set");
        })
        .expect("Environment misconfigured!")
}
