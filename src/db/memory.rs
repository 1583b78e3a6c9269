use serde_json::Value;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::document_store::{CounterPatch, DocumentStore, Query},
    error::{AppError, AppResult},
    models::{NewSearchCounter, SearchCounter},
};

/// Page size Appwrite applies when a list request carries no limit
const DEFAULT_LIST_LIMIT: usize = 25;

/// In-process counter collection with the same query semantics as Appwrite.
///
/// Documents keep insertion order, so ties under `OrderDesc` come back in
/// creation order.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<Vec<SearchCounter>>,
    unavailable: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<SearchCounter>) -> Self {
        Self {
            documents: RwLock::new(documents),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent call fail, simulating an unreachable store
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }

    pub async fn snapshot(&self) -> Vec<SearchCounter> {
        self.documents.read().await.clone()
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            return Err(AppError::DocumentStore(
                "memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a
            .as_str()
            .unwrap_or_default()
            .cmp(b.as_str().unwrap_or_default()),
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list_documents(&self, queries: &[Query]) -> AppResult<Vec<SearchCounter>> {
        self.ensure_available()?;

        let documents = self.documents.read().await;
        let mut rows: Vec<(Value, &SearchCounter)> = documents
            .iter()
            .map(|doc| serde_json::to_value(doc).map(|value| (value, doc)))
            .collect::<Result<_, _>>()?;

        let mut limit = DEFAULT_LIST_LIMIT;
        for query in queries {
            match query {
                Query::Equal { attribute, values } => {
                    rows.retain(|(value, _)| {
                        value
                            .get(attribute)
                            .is_some_and(|field| values.contains(field))
                    });
                }
                Query::OrderDesc(attribute) => {
                    rows.sort_by(|(a, _), (b, _)| {
                        compare_values(&b[attribute.as_str()], &a[attribute.as_str()])
                    });
                }
                Query::Limit(n) => limit = *n,
            }
        }

        Ok(rows
            .into_iter()
            .take(limit)
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    async fn create_document(&self, data: &NewSearchCounter) -> AppResult<SearchCounter> {
        self.ensure_available()?;

        let document = SearchCounter::from_new(Uuid::new_v4().simple().to_string(), data.clone());
        self.documents.write().await.push(document.clone());
        Ok(document)
    }

    async fn update_document(
        &self,
        document_id: &str,
        patch: &CounterPatch,
    ) -> AppResult<SearchCounter> {
        self.ensure_available()?;

        let mut documents = self.documents.write().await;
        let document = documents
            .iter_mut()
            .find(|doc| doc.id == document_id)
            .ok_or_else(|| AppError::NotFound(format!("document {}", document_id)))?;

        document.count = patch.count;
        Ok(document.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{COUNT_ATTR, SEARCH_TERM_ATTR};

    fn counter(id: &str, term: &str, count: u64) -> SearchCounter {
        SearchCounter {
            id: id.to_string(),
            search_term: term.to_string(),
            count,
            poster_url: None,
            content_id: 1,
            media_type: None,
        }
    }

    #[tokio::test]
    async fn test_equal_query_is_case_sensitive() {
        let store = MemoryDocumentStore::with_documents(vec![
            counter("a", "Dune", 1),
            counter("b", "dune", 3),
        ]);

        let found = store
            .list_documents(&[Query::equal(SEARCH_TERM_ATTR, "Dune")])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "a");
    }

    #[tokio::test]
    async fn test_order_desc_with_limit_keeps_ties_stable() {
        let store = MemoryDocumentStore::with_documents(vec![
            counter("a", "alien", 2),
            counter("b", "batman", 9),
            counter("c", "cars", 2),
            counter("d", "dune", 5),
        ]);

        let top = store
            .list_documents(&[Query::limit(3), Query::order_desc(COUNT_ATTR)])
            .await
            .unwrap();

        let ids: Vec<&str> = top.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a"]);
    }

    #[tokio::test]
    async fn test_default_limit() {
        let documents = (0..30)
            .map(|i| counter(&i.to_string(), &format!("term {}", i), 1))
            .collect();
        let store = MemoryDocumentStore::with_documents(documents);

        let listed = store.list_documents(&[]).await.unwrap();
        assert_eq!(listed.len(), DEFAULT_LIST_LIMIT);
    }

    #[tokio::test]
    async fn test_update_only_touches_count() {
        let mut original = counter("a", "alien", 2);
        original.poster_url = Some("https://img.test/alien.jpg".to_string());
        let store = MemoryDocumentStore::with_documents(vec![original.clone()]);

        let updated = store
            .update_document("a", &CounterPatch { count: 3 })
            .await
            .unwrap();

        assert_eq!(updated.count, 3);
        assert_eq!(updated.poster_url, original.poster_url);
        assert_eq!(updated.content_id, original.content_id);
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let store = MemoryDocumentStore::new();
        let result = store
            .update_document("missing", &CounterPatch { count: 2 })
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let store = MemoryDocumentStore::new();
        store.set_unavailable(true);
        assert!(store.list_documents(&[]).await.is_err());
    }
}
