use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::{NewSearchCounter, SearchCounter},
};

/// Query primitive understood by the counter collection
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Matches documents whose attribute equals any of the values
    Equal { attribute: String, values: Vec<Value> },
    Limit(usize),
    OrderDesc(String),
}

impl Query {
    pub fn equal(attribute: &str, value: impl Into<Value>) -> Self {
        Query::Equal {
            attribute: attribute.to_string(),
            values: vec![value.into()],
        }
    }

    pub fn limit(limit: usize) -> Self {
        Query::Limit(limit)
    }

    pub fn order_desc(attribute: &str) -> Self {
        Query::OrderDesc(attribute.to_string())
    }

    /// Serializes the query in Appwrite's JSON query syntax (1.5+)
    pub fn to_appwrite(&self) -> String {
        let query = match self {
            Query::Equal { attribute, values } => json!({
                "method": "equal",
                "attribute": attribute,
                "values": values,
            }),
            Query::Limit(limit) => json!({
                "method": "limit",
                "values": [limit],
            }),
            Query::OrderDesc(attribute) => json!({
                "method": "orderDesc",
                "attribute": attribute,
            }),
        };
        query.to_string()
    }
}

/// Partial update applied to an existing counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterPatch {
    pub count: u64,
}

/// Remote collection holding search counters
///
/// Implementations give per-document write atomicity only. There is no
/// transaction spanning a read and the write that follows it.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists documents matching every query
    async fn list_documents(&self, queries: &[Query]) -> AppResult<Vec<SearchCounter>>;

    /// Creates a document with a store-assigned id
    async fn create_document(&self, data: &NewSearchCounter) -> AppResult<SearchCounter>;

    /// Updates only the fields present in the patch
    async fn update_document(
        &self,
        document_id: &str,
        patch: &CounterPatch,
    ) -> AppResult<SearchCounter>;
}
