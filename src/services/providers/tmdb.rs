/// TMDB v3 provider
///
/// API Flow:
/// 1. Search: /search/{movie|tv}?query= → paged results
/// 2. Discover: /discover/{movie|tv}?sort_by=popularity.desc → paged results
/// 3. Details: /{movie|tv}/{id} → full record
///
/// "Both" requests hit the movie and TV endpoints concurrently and merge the pages.
use crate::{
    cached,
    config::Config,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{ContentDetails, ContentFilter, ContentItem, MediaType, TmdbPage},
    services::providers::{merge_by_popularity, ContentProvider},
};
use reqwest::{header::ACCEPT, Client as HttpClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::instrument;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
    search_ttl: u64,
    details_ttl: u64,
}

fn tag(items: Vec<ContentItem>, media_type: MediaType) -> Vec<ContentItem> {
    items
        .into_iter()
        .map(|mut item| {
            item.media_type = media_type;
            item
        })
        .collect()
}

impl TmdbProvider {
    pub fn new(
        cache: Cache,
        api_key: String,
        api_url: String,
        search_ttl: u64,
        details_ttl: u64,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache,
            search_ttl,
            details_ttl,
        }
    }

    pub fn from_config(config: &Config, cache: Cache) -> Self {
        Self::new(
            cache,
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.search_cache_ttl,
            config.details_cache_ttl,
        )
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http_client
            .get(format!("{}{}", self.api_url.trim_end_matches('/'), path))
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder, what: &str) -> AppResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(what.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(error = %e, what, "Failed to deserialize TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }

    /// Fetches the first page of `/{endpoint}/{media_type}`
    async fn fetch_list(
        &self,
        endpoint: &str,
        media_type: MediaType,
        params: &[(&str, &str)],
    ) -> AppResult<Vec<ContentItem>> {
        let path = format!("/{}/{}", endpoint, media_type);
        let page: TmdbPage<ContentItem> =
            Self::send_json(self.get(&path).query(params), &path).await?;
        Ok(tag(page.results, media_type))
    }

    async fn fetch_filtered(
        &self,
        endpoint: &str,
        filter: ContentFilter,
        params: &[(&str, &str)],
    ) -> AppResult<Vec<ContentItem>> {
        match filter {
            ContentFilter::Movie => self.fetch_list(endpoint, MediaType::Movie, params).await,
            ContentFilter::Tv => self.fetch_list(endpoint, MediaType::Tv, params).await,
            ContentFilter::Both => {
                let (movies, shows) = tokio::try_join!(
                    self.fetch_list(endpoint, MediaType::Movie, params),
                    self.fetch_list(endpoint, MediaType::Tv, params),
                )?;
                Ok(merge_by_popularity(vec![
                    (MediaType::Movie, movies),
                    (MediaType::Tv, shows),
                ]))
            }
        }
    }
}

#[async_trait::async_trait]
impl ContentProvider for TmdbProvider {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, filter: ContentFilter) -> AppResult<Vec<ContentItem>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::Search {
                filter,
                query: query.to_string(),
            },
            self.search_ttl,
            async move {
                let results = self
                    .fetch_filtered("search", filter, &[("query", query)])
                    .await?;

                tracing::info!(
                    query = %query,
                    filter = %filter,
                    results = results.len(),
                    provider = "tmdb",
                    "Content search completed"
                );

                Ok::<_, AppError>(results)
            }
        )
    }

    #[instrument(skip(self))]
    async fn discover(&self, filter: ContentFilter) -> AppResult<Vec<ContentItem>> {
        cached!(
            self.cache,
            CacheKey::Discover(filter),
            self.search_ttl,
            async move {
                let results = self
                    .fetch_filtered("discover", filter, &[("sort_by", "popularity.desc")])
                    .await?;

                tracing::info!(
                    filter = %filter,
                    results = results.len(),
                    provider = "tmdb",
                    "Discovery completed"
                );

                Ok::<_, AppError>(results)
            }
        )
    }

    #[instrument(skip(self))]
    async fn details(&self, media_type: MediaType, id: u64) -> AppResult<ContentDetails> {
        cached!(
            self.cache,
            CacheKey::Details { media_type, id },
            self.details_ttl,
            async move {
                let path = format!("/{}/{}", media_type, id);
                let mut details: ContentDetails = Self::send_json(self.get(&path), &path).await?;
                details.media_type = media_type;
                Ok::<_, AppError>(details)
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
