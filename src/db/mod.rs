pub mod appwrite;
pub mod document_store;
pub mod key_value;
pub mod memory;
pub mod redis;

pub use self::appwrite::AppwriteStore;
pub use self::document_store::{CounterPatch, DocumentStore, Query};
pub use self::key_value::{KeyValueStore, MemoryKeyValueStore, RedisKeyValueStore};
pub use self::memory::MemoryDocumentStore;
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
