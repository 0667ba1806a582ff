use serde::{Deserialize, Serialize};
use std::fmt;

/// Which half of the catalog an item belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
    Tv,
}

impl MediaType {
    /// Path segment used by the metadata API ("movie" / "tv")
    pub fn path_segment(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// A movie or TV show as returned by list and search endpoints.
///
/// TV payloads carry `name` / `first_air_date` instead of `title` / `release_date`;
/// both shapes land in the same fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentItem {
    pub id: u64,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, alias = "first_air_date")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub popularity: f64,
    // List payloads omit this for single-type endpoints; the client fills it in
    #[serde(default)]
    pub media_type: MediaType,
}

impl ContentItem {
    /// Four-digit release year, or "TBA" when the date is missing or empty
    pub fn year_label(&self) -> String {
        self.release_date
            .as_deref()
            .filter(|d| d.len() >= 4)
            .map(|d| d[..4].to_string())
            .unwrap_or_else(|| "TBA".to_string())
    }

    /// Rating with one decimal place ("7.4")
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.vote_average)
    }

    /// Up to three genre names for display
    pub fn genre_labels(&self) -> Vec<&'static str> {
        crate::genre::genre_names(&self.genre_ids)
    }
}

/// One page of a paginated list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    pub results: Vec<T>,
    #[serde(default = "first_page")]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

impl<T> Page<T> {
    pub fn empty(page: u32) -> Self {
        Self {
            page,
            results: Vec::new(),
            total_pages: page,
            total_results: 0,
        }
    }

    /// True when the server has no pages after this one
    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }
}
