/// Content metadata provider abstraction
///
/// The HTTP layer and the search orchestration only see this trait, so the
/// metadata source can be swapped (or faked in tests) without touching them.
use crate::{
    error::AppResult,
    models::{ContentDetails, ContentFilter, ContentItem, MediaType},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[async_trait::async_trait]
pub trait ContentProvider: Send + Sync {
    /// Searches titles by free text.
    ///
    /// With [`ContentFilter::Both`] the movie and TV results are merged and
    /// ordered by popularity, most popular first.
    async fn search(&self, query: &str, filter: ContentFilter) -> AppResult<Vec<ContentItem>>;

    /// Popular titles for the landing view
    async fn discover(&self, filter: ContentFilter) -> AppResult<Vec<ContentItem>>;

    async fn details(&self, media_type: MediaType, id: u64) -> AppResult<ContentDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Tags each list with its media type, concatenates them in order and sorts by
/// popularity descending. The sort is stable, so equal popularity keeps the
/// movie-before-TV order. Missing popularity ranks last.
pub fn merge_by_popularity(lists: Vec<(MediaType, Vec<ContentItem>)>) -> Vec<ContentItem> {
    let mut merged: Vec<ContentItem> = lists
        .into_iter()
        .flat_map(|(media_type, items)| {
            items.into_iter().map(move |mut item| {
                item.media_type = media_type;
                item
            })
        })
        .collect();

    merged.sort_by(|a, b| {
        let a = a.popularity.unwrap_or(f64::MIN);
        let b = b.popularity.unwrap_or(f64::MIN);
        b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
    });

    merged
}
