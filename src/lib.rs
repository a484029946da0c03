pub mod app;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod favorites;
pub mod loader;
pub mod render;
pub mod search;
pub mod storage;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::app::{App, Event};
    pub use crate::catalog::{Catalog, FilteredView, MAX_LISTINGS};
    pub use crate::config::Config;
    pub use crate::error::LoadError;
    pub use crate::favorites::FavoritesStore;
    pub use crate::loader::{CatalogLoader, FetchResponse, Fetcher, HttpFetcher, SourceStrategy};
    pub use crate::storage::{MemoryStorage, Storage};
    pub use crate::types::{HostInfo, Listing};
    pub use crate::Stayboard;
}

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::app::App;
use crate::config::Config;
use crate::db::Database;
use crate::error::LoadError;
use crate::favorites::FavoritesStore;
use crate::loader::{CatalogLoader, HttpFetcher};
use crate::storage::{MemoryStorage, Storage};

/// Library entry point. Owns the configuration and the favorites storage.
pub struct Stayboard {
    config: Config,
    storage: Arc<dyn Storage>,
}

impl Stayboard {
    /// Open the configured database, or in-memory storage when `ephemeral` is set.
    pub async fn connect(config: Config, ephemeral: bool) -> Result<Self> {
        let storage: Arc<dyn Storage> = if ephemeral {
            Arc::new(MemoryStorage::new())
        } else {
            Arc::new(Database::open(config.database_url.as_deref()).await?)
        };
        Ok(Self::with_storage(config, storage))
    }

    pub fn with_storage(config: Config, storage: Arc<dyn Storage>) -> Self {
        Self { config, storage }
    }

    pub fn config(&self) -> &Config { &self.config }

    pub fn loader(&self) -> Result<CatalogLoader<HttpFetcher>> {
        let base = self.config.base()?;
        debug!(base = %base, "resolving sources against base");
        let fetcher = HttpFetcher::new(&self.config.user_agent)?;
        Ok(CatalogLoader::new(fetcher, base, self.config.source.strategy()))
    }

    pub async fn favorites(&self) -> Result<FavoritesStore> {
        FavoritesStore::load(self.storage.clone(), self.config.favorites_key.clone()).await
    }

    /// Favorites are read before the catalog. The outer error covers storage and
    /// setup; the inner one is a load failure meant for the error panel.
    pub async fn start(&self) -> Result<Result<App, LoadError>> {
        let favorites = self.favorites().await?;
        let loader = self.loader()?;
        app::startup(&loader, favorites, self.config.search_input).await
    }

    /// Page showing the error panel for a failed start.
    pub fn failure_page(&self, err: &LoadError) -> Result<String> {
        let container = app::failure_container(err)?;
        Ok(render::page(&container, "", self.config.search_input)?)
    }
}
