use serde::Deserialize;

use crate::services::trending::MAX_SHELF_SIZE;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v4 read access token, sent as a bearer token
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix joined with a TMDB `poster_path` to build an image URL
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    /// Appwrite REST endpoint
    #[serde(default = "default_appwrite_endpoint")]
    pub appwrite_endpoint: String,

    pub appwrite_project_id: String,
    pub appwrite_database_id: String,
    pub appwrite_collection_id: String,

    /// Server API key. Without it requests rely on the collection's public permissions.
    #[serde(default)]
    pub appwrite_api_key: Option<String>,

    /// Set when the collection defines a `media_type` string attribute. Off by default
    /// since Appwrite rejects documents carrying undefined attributes.
    #[serde(default)]
    pub appwrite_media_type_attr: bool,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of top counters fetched before sampling the trending shelf
    #[serde(default = "default_trending_pool_size")]
    pub trending_pool_size: usize,

    /// Maximum number of entries on the trending shelf, at most 5
    #[serde(default = "default_trending_shelf_size")]
    pub trending_shelf_size: usize,

    /// Image shown on the trending shelf when a counter has no poster
    #[serde(default = "default_placeholder_poster")]
    pub placeholder_poster: String,

    /// Key holding the liked set in the key-value backend
    #[serde(default = "default_liked_storage_key")]
    pub liked_storage_key: String,

    /// TTL in seconds for cached search and discover responses
    #[serde(default = "default_search_cache_ttl")]
    pub search_cache_ttl: u64,

    /// TTL in seconds for cached details responses
    #[serde(default = "default_details_cache_ttl")]
    pub details_cache_ttl: u64,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_appwrite_endpoint() -> String {
    "https://cloud.appwrite.io/v1".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_trending_pool_size() -> usize {
    20
}

fn default_trending_shelf_size() -> usize {
    5
}

fn default_placeholder_poster() -> String {
    "/no-poster.png".to_string()
}

fn default_liked_storage_key() -> String {
    "likedMovies".to_string()
}

fn default_search_cache_ttl() -> u64 {
    3600 // 1 hour
}

fn default_details_cache_ttl() -> u64 {
    86400 // 1 day
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects trending sizes the shelf cannot honour
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.trending_pool_size > 0,
            "TRENDING_POOL_SIZE must be at least 1"
        );
        anyhow::ensure!(
            (1..=MAX_SHELF_SIZE).contains(&self.trending_shelf_size),
            "TRENDING_SHELF_SIZE must be between 1 and {}, got {}",
            MAX_SHELF_SIZE,
            self.trending_shelf_size
        );
        Ok(())
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
