use std::sync::Arc;

use crate::{
    db::{CounterPatch, DocumentStore, Query},
    error::AppResult,
    models::{ContentItem, NewSearchCounter, SEARCH_TERM_ATTR},
};

/// What a successful recording did to the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Created { document_id: String },
    Incremented { document_id: String, count: u64 },
}

/// Upserts the popularity counter for a search term.
///
/// Each call is one read followed by one write with no isolation between
/// them. Two concurrent first searches for the same term can both miss on the
/// read and create two documents; this is accepted rather than locked around.
pub struct SearchRecorder {
    store: Arc<dyn DocumentStore>,
    image_base_url: String,
    record_media_type: bool,
}

impl SearchRecorder {
    pub fn new(store: Arc<dyn DocumentStore>, image_base_url: String) -> Self {
        Self {
            store,
            image_base_url,
            record_media_type: false,
        }
    }

    /// Also write `media_type` on new counters. The collection must define the attribute,
    /// otherwise Appwrite rejects every create.
    pub fn with_media_type(mut self, enabled: bool) -> Self {
        self.record_media_type = enabled;
        self
    }

    /// Records a search and swallows any failure after logging it
    pub async fn record_search(&self, search_term: &str, item: &ContentItem) {
        match self.try_record(search_term, item).await {
            Ok(RecordOutcome::Created { document_id }) => {
                tracing::info!(
                    search_term = %search_term,
                    document_id = %document_id,
                    content_id = item.id,
                    "Created search counter"
                );
            }
            Ok(RecordOutcome::Incremented { document_id, count }) => {
                tracing::debug!(
                    search_term = %search_term,
                    document_id = %document_id,
                    count,
                    "Incremented search counter"
                );
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    search_term = %search_term,
                    "Failed to record search"
                );
            }
        }
    }

    /// The term is matched exactly as typed, without case or whitespace normalization
    pub async fn try_record(&self, search_term: &str, item: &ContentItem) -> AppResult<RecordOutcome> {
        let existing = self
            .store
            .list_documents(&[Query::equal(SEARCH_TERM_ATTR, search_term)])
            .await?;

        match existing.into_iter().next() {
            Some(counter) => {
                let patch = CounterPatch {
                    count: counter.count + 1,
                };
                let updated = self.store.update_document(&counter.id, &patch).await?;
                Ok(RecordOutcome::Incremented {
                    document_id: updated.id,
                    count: updated.count,
                })
            }
            None => {
                let mut new = NewSearchCounter::first_search(search_term, item, &self.image_base_url);
                if self.record_media_type {
                    new = new.with_media_type(item.media_type);
                }
                let created = self.store.create_document(&new).await?;
                Ok(RecordOutcome::Created {
                    document_id: created.id,
                })
            }
        }
    }
}
