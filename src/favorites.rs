use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::storage::Storage;

pub const DEFAULT_FAVORITES_KEY: &str = "favs";

/// Favorite listing ids, persisted in full as one JSON array entry on every change.
pub struct FavoritesStore {
    storage: Arc<dyn Storage>,
    key: String,
    ids: BTreeSet<String>,
}

impl FavoritesStore {
    /// Read the entry once. Missing or unreadable data starts an empty set.
    pub async fn load(storage: Arc<dyn Storage>, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let raw = storage.get_item(&key).await?;
        let ids = match raw {
            None => BTreeSet::new(),
            Some(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(list) => list.into_iter().collect(),
                Err(e) => {
                    warn!(key = %key, error = %e, "ignoring invalid favorites entry");
                    BTreeSet::new()
                }
            },
        };
        debug!(key = %key, count = ids.len(), "loaded favorites");
        Ok(Self { storage, key, ids })
    }

    pub fn contains(&self, id: &str) -> bool { self.ids.contains(id) }

    pub fn ids(&self) -> impl Iterator<Item = &str> { self.ids.iter().map(String::as_str) }

    pub fn len(&self) -> usize { self.ids.len() }

    pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    /// Add `id` if absent, remove it otherwise, then persist. Returns the new membership.
    /// The in-memory set only changes once the write has succeeded.
    pub async fn toggle(&mut self, id: &str) -> Result<bool> {
        let mut next = self.ids.clone();
        let active = if next.remove(id) {
            false
        } else {
            next.insert(id.to_string());
            true
        };
        self.persist(&next).await?;
        self.ids = next;
        debug!(id, active, "toggled favorite");
        Ok(active)
    }

    async fn persist(&self, ids: &BTreeSet<String>) -> Result<()> {
        let payload = serde_json::to_string(ids)?;
        self.storage
            .set_item(&self.key, &payload)
            .await
            .with_context(|| format!("persisting favorites under {}", self.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use anyhow::bail;
    use async_trait::async_trait;

    struct FailingStorage;

    #[async_trait]
    impl Storage for FailingStorage {
        async fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
            bail!("disk full")
        }
    }

    #[tokio::test]
    async fn toggle_adds_persists_and_removes() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item("favs", "[\"b\"]").await.unwrap();
        let before = storage.get_item("favs").await.unwrap();

        let mut favs = FavoritesStore::load(storage.clone(), "favs").await.unwrap();
        assert!(favs.toggle("a").await.unwrap());
        assert!(favs.contains("a"));
        assert_eq!(storage.get_item("favs").await.unwrap().as_deref(), Some("[\"a\",\"b\"]"));

        assert!(!favs.toggle("a").await.unwrap());
        assert!(!favs.contains("a"));
        assert_eq!(storage.get_item("favs").await.unwrap(), before);
    }

    #[tokio::test]
    async fn missing_or_invalid_entry_is_empty() {
        let storage = Arc::new(MemoryStorage::new());
        let favs = FavoritesStore::load(storage.clone(), "favs").await.unwrap();
        assert!(favs.is_empty());

        storage.set_item("favs", "{not json").await.unwrap();
        let favs = FavoritesStore::load(storage, "favs").await.unwrap();
        assert_eq!(favs.len(), 0);
    }

    #[tokio::test]
    async fn state_is_visible_to_a_fresh_load() {
        let storage = Arc::new(MemoryStorage::new());
        let mut favs = FavoritesStore::load(storage.clone(), "favs").await.unwrap();
        favs.toggle("42").await.unwrap();

        let reloaded = FavoritesStore::load(storage, "favs").await.unwrap();
        assert_eq!(reloaded.ids().collect::<Vec<_>>(), vec!["42"]);
    }

    #[tokio::test]
    async fn failed_write_leaves_set_unchanged() {
        let mut favs = FavoritesStore::load(Arc::new(FailingStorage), "favs").await.unwrap();
        let err = favs.toggle("a").await.unwrap_err();
        assert!(format!("{err:#}").contains("disk full"));
        assert!(!favs.contains("a"));
        assert!(favs.is_empty());
    }
}
