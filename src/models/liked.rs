use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContentItem, MediaType};

/// Snapshot of a content item taken when the user liked it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LikedItem {
    pub id: u64,
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default, alias = "first_air_date")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub media_type: MediaType,
    #[serde(default = "Utc::now")]
    pub liked_at: DateTime<Utc>,
}

impl From<ContentItem> for LikedItem {
    fn from(item: ContentItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            poster_path: item.poster_path,
            vote_average: item.vote_average,
            release_date: item.release_date,
            original_language: item.original_language,
            media_type: item.media_type,
            liked_at: Utc::now(),
        }
    }
}

/// Filter applied when listing liked items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikedFilter {
    #[default]
    All,
    Movie,
    Tv,
}

impl LikedFilter {
    pub fn matches(&self, media_type: MediaType) -> bool {
        match self {
            LikedFilter::All => true,
            LikedFilter::Movie => media_type == MediaType::Movie,
            LikedFilter::Tv => media_type == MediaType::Tv,
        }
    }
}
