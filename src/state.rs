use std::sync::Arc;

use crate::{
    catalog::{Catalog, TmdbClient},
    config::Config,
    favorites::FavoritesService,
    store::JsonFileStore,
};

pub struct State {
    pub config: Config,
    pub catalog: Arc<dyn Catalog>,
    pub favorites: FavoritesService,
}

impl State {
    pub fn new() -> Arc<Self> {
        let config = Config::load();

        let catalog = Arc::new(TmdbClient::new(&config));
        let favorites = FavoritesService::new(Arc::new(JsonFileStore::new(&config.favorites_path)));

        Arc::new(Self {
            config,
            catalog,
            favorites,
        })
    }
}
