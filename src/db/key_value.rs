use ::redis::{AsyncCommands, Client};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::AppResult;

/// String key-value backend for small client-owned collections such as the liked set
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: String) -> AppResult<()>;
}

#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// Persists values in Redis without expiry
#[derive(Clone)]
pub struct RedisKeyValueStore {
    redis_client: Client,
}

impl RedisKeyValueStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(key, value).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_get_missing() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("likedMovies").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_set_overwrites() {
        let store = MemoryKeyValueStore::new();
        store.set("likedMovies", "[]".to_string()).await.unwrap();
        store.set("likedMovies", "[1]".to_string()).await.unwrap();
        assert_eq!(
            store.get("likedMovies").await.unwrap().as_deref(),
            Some("[1]")
        );
    }
}
