use serde::{Deserialize, Serialize};

use super::{poster_url, ContentItem, MediaType};

/// Collection attribute holding the search term
pub const SEARCH_TERM_ATTR: &str = "searchTerm";
/// Collection attribute holding the popularity counter
pub const COUNT_ATTR: &str = "count";

/// Popularity counter for one search term, as stored in the Appwrite collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchCounter {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: u64,
    /// Snapshot taken when the counter was created; increments never touch it
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(rename = "movie_id")]
    pub content_id: u64,
    /// Absent on counters written before media types were recorded
    #[serde(default)]
    pub media_type: Option<MediaType>,
}

impl SearchCounter {
    pub fn from_new(id: String, new: NewSearchCounter) -> Self {
        Self {
            id,
            search_term: new.search_term,
            count: new.count,
            poster_url: new.poster_url,
            content_id: new.content_id,
            media_type: new.media_type,
        }
    }

    /// Media type used to link the counter back to its content, defaulting to movie
    pub fn inferred_media_type(&self) -> MediaType {
        self.media_type.unwrap_or_default()
    }
}

/// Document payload for a counter that does not exist yet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSearchCounter {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(rename = "movie_id")]
    pub content_id: u64,
    /// Only sent when the collection defines a `media_type` attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
}

impl NewSearchCounter {
    /// Counter for a term searched for the first time, carrying only the
    /// `searchTerm`, `count`, `poster_url` and `movie_id` attributes
    pub fn first_search(search_term: &str, item: &ContentItem, image_base_url: &str) -> Self {
        Self {
            search_term: search_term.to_string(),
            count: 1,
            poster_url: poster_url(image_base_url, item.poster_path.as_deref()),
            content_id: item.id,
            media_type: None,
        }
    }

    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }
}
