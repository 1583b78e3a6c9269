use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    db::KeyValueStore,
    error::AppResult,
    models::{LikedFilter, LikedItem},
};

/// The user's liked titles, kept as one JSON array under a single storage key
pub struct LikedRepository {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    /// Serializes read-modify-write cycles issued through this repository
    write_lock: Mutex<()>,
}

impl LikedRepository {
    pub fn new(storage: Arc<dyn KeyValueStore>, key: String) -> Self {
        Self {
            storage,
            key,
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> AppResult<Vec<LikedItem>> {
        let Some(raw) = self.storage.get(&self.key).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(error = %e, key = %self.key, "Stored liked set is corrupt, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, items: &[LikedItem]) -> AppResult<()> {
        let raw = serde_json::to_string(items)?;
        self.storage.set(&self.key, raw).await
    }

    /// Liked items in like order, restricted to the filter
    pub async fn list(&self, filter: LikedFilter) -> AppResult<Vec<LikedItem>> {
        let items = self.load().await?;
        Ok(items
            .into_iter()
            .filter(|item| filter.matches(item.media_type))
            .collect())
    }

    pub async fn contains(&self, id: u64) -> AppResult<bool> {
        Ok(self.load().await?.iter().any(|item| item.id == id))
    }

    /// Adds the item unless its id is already liked. Returns whether it was added.
    pub async fn add(&self, item: LikedItem) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.load().await?;

        if items.iter().any(|existing| existing.id == item.id) {
            return Ok(false);
        }

        tracing::debug!(id = item.id, media_type = %item.media_type, "Liked item");
        items.push(item);
        self.save(&items).await?;
        Ok(true)
    }

    /// Removes the item with this id. Returns whether anything was removed.
    pub async fn remove(&self, id: u64) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.load().await?;
        let before = items.len();

        items.retain(|item| item.id != id);
        if items.len() == before {
            return Ok(false);
        }

        self.save(&items).await?;
        Ok(true)
    }
}
