use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::content::ContentItem;
use crate::video::TrailerRef;

/// Wrapper used by appended sub-resources (`videos`, `similar`, `reviews`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Results<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Default for Results<T> {
    fn default() -> Self {
        Self { results: Vec::new() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorDetails {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar_path: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub author_details: AuthorDetails,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Movie or TV detail with appended videos, similar titles and reviews
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentDetail {
    #[serde(flatten)]
    pub item: ContentItem,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// TV only
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub videos: Results<TrailerRef>,
    #[serde(default)]
    pub similar: Results<ContentItem>,
    #[serde(default)]
    pub reviews: Results<Review>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    pub id: u64,
    pub episode_number: u32,
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub still_path: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub vote_average: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Season {
    pub season_number: u32,
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}
