use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{ContentFilter, ContentItem},
    services::{providers::ContentProvider, search_recorder::SearchRecorder},
};

/// Search entry point used by the HTTP layer.
///
/// Blank queries fall through to discovery. A non-blank query with at least
/// one result is recorded against its top result, using the query exactly as
/// typed.
pub struct ContentSearch {
    provider: Arc<dyn ContentProvider>,
    recorder: Arc<SearchRecorder>,
}

impl ContentSearch {
    pub fn new(provider: Arc<dyn ContentProvider>, recorder: Arc<SearchRecorder>) -> Self {
        Self { provider, recorder }
    }

    pub async fn find(&self, query: &str, filter: ContentFilter) -> AppResult<Vec<ContentItem>> {
        if query.trim().is_empty() {
            return self.provider.discover(filter).await;
        }

        let results = self.provider.search(query, filter).await?;

        match results.first() {
            Some(top) => self.recorder.record_search(query, top).await,
            None => tracing::debug!(
                query = %query,
                filter = %filter,
                provider = self.provider.name(),
                "No results, search not recorded"
            ),
        }

        Ok(results)
    }
}
