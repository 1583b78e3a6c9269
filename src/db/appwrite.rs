/// Appwrite Databases REST client for the search counter collection
///
/// Endpoints used:
/// - `GET    /databases/{db}/collections/{col}/documents` with `queries[]`
/// - `POST   /databases/{db}/collections/{col}/documents`
/// - `PATCH  /databases/{db}/collections/{col}/documents/{id}`
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

use crate::{
    config::Config,
    db::document_store::{CounterPatch, DocumentStore, Query},
    error::{AppError, AppResult},
    models::{NewSearchCounter, SearchCounter},
};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";
/// Asks Appwrite to generate the document id
const UNIQUE_ID: &str = "unique()";

#[derive(Clone)]
pub struct AppwriteStore {
    http_client: HttpClient,
    endpoint: String,
    project_id: String,
    database_id: String,
    collection_id: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    #[allow(dead_code)]
    total: u64,
    documents: Vec<SearchCounter>,
}

#[derive(Debug, Deserialize)]
struct AppwriteErrorBody {
    message: String,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
}

impl AppwriteStore {
    pub fn new(
        endpoint: String,
        project_id: String,
        database_id: String,
        collection_id: String,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            endpoint,
            project_id,
            database_id,
            collection_id,
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.appwrite_endpoint.clone(),
            config.appwrite_project_id.clone(),
            config.appwrite_database_id.clone(),
            config.appwrite_collection_id.clone(),
            config.appwrite_api_key.clone(),
        )
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint.trim_end_matches('/'),
            self.database_id,
            self.collection_id
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, url)
            .header(PROJECT_HEADER, &self.project_id);

        match &self.api_key {
            Some(key) => builder.header(KEY_HEADER, key),
            None => builder,
        }
    }

    /// Decodes a successful response or turns Appwrite's error body into an AppError
    async fn parse<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<AppwriteErrorBody>(&body) {
                Ok(err) => match err.error_type {
                    Some(kind) => format!("{} ({})", err.message, kind),
                    None => err.message,
                },
                Err(_) => body,
            };
            return Err(AppError::DocumentStore(format!(
                "Appwrite returned status {}: {}",
                status, message
            )));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(error = %e, response = %text, "Failed to deserialize Appwrite response");
            AppError::DocumentStore(format!("Failed to parse Appwrite response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl DocumentStore for AppwriteStore {
    async fn list_documents(&self, queries: &[Query]) -> AppResult<Vec<SearchCounter>> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_appwrite()))
            .collect();

        let response = self
            .request(Method::GET, &self.documents_url())
            .query(&params)
            .send()
            .await?;

        let list: DocumentList = Self::parse(response).await?;

        tracing::debug!(
            returned = list.documents.len(),
            query_count = queries.len(),
            "Listed search counters"
        );

        Ok(list.documents)
    }

    async fn create_document(&self, data: &NewSearchCounter) -> AppResult<SearchCounter> {
        let response = self
            .request(Method::POST, &self.documents_url())
            .json(&json!({
                "documentId": UNIQUE_ID,
                "data": data,
            }))
            .send()
            .await?;

        Self::parse(response).await
    }

    async fn update_document(
        &self,
        document_id: &str,
        patch: &CounterPatch,
    ) -> AppResult<SearchCounter> {
        let url = format!("{}/{}", self.documents_url(), document_id);
        let response = self
            .request(Method::PATCH, &url)
            .json(&json!({ "data": patch }))
            .send()
            .await?;

        Self::parse(response).await
    }
}
