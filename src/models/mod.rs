use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod liked;
pub mod search_counter;

pub use liked::{LikedFilter, LikedItem};
pub use search_counter::{NewSearchCounter, SearchCounter, COUNT_ATTR, SEARCH_TERM_ATTR};

/// Kind of content a TMDB record describes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
    Tv,
}

impl MediaType {
    /// Path segment TMDB uses for this media type
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which media types a search or discovery request covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFilter {
    Movie,
    Tv,
    #[default]
    Both,
}

impl ContentFilter {
    /// Media types to query, movies first
    pub fn media_types(&self) -> &'static [MediaType] {
        match self {
            ContentFilter::Movie => &[MediaType::Movie],
            ContentFilter::Tv => &[MediaType::Tv],
            ContentFilter::Both => &[MediaType::Movie, MediaType::Tv],
        }
    }
}

impl Display for ContentFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentFilter::Movie => f.write_str("movie"),
            ContentFilter::Tv => f.write_str("tv"),
            ContentFilter::Both => f.write_str("both"),
        }
    }
}

/// A movie or TV show as returned by TMDB search and discover endpoints.
///
/// Movies carry `title`/`release_date` while TV shows carry `name`/`first_air_date`;
/// both shapes deserialize into the same fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentItem {
    pub id: u64,
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, alias = "first_air_date")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    /// Not part of TMDB's per-type payloads; set by the search layer
    #[serde(default)]
    pub media_type: MediaType,
}

/// Paged envelope used by TMDB list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionCompany {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub iso_639_1: Option<String>,
    #[serde(default)]
    pub english_name: Option<String>,
}

/// Full record from `/movie/{id}` or `/tv/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentDetails {
    pub id: u64,
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, alias = "first_air_date")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub revenue: Option<u64>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub media_type: MediaType,
}

/// Builds a full poster URL from a TMDB `poster_path`.
///
/// Missing or blank paths yield `None` so callers never store `"null"` or a bare prefix.
pub fn poster_url(image_base_url: &str, poster_path: Option<&str>) -> Option<String> {
    let path = poster_path.map(str::trim).filter(|p| !p.is_empty())?;
    let base = image_base_url.trim_end_matches('/');

    if path.starts_with('/') {
        Some(format!("{}{}", base, path))
    } else {
        Some(format!("{}/{}", base, path))
    }
}
