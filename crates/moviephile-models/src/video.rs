use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Video category as reported by the metadata API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VideoKind {
    Trailer,
    Teaser,
    Clip,
    Featurette,
    #[serde(rename = "Behind the Scenes")]
    BehindTheScenes,
    Bloopers,
    #[serde(other)]
    Other,
}

/// A video attached to a content item (trailer, teaser, clip...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrailerRef {
    pub id: String,
    /// External key on the hosting site (YouTube video id)
    pub key: String,
    #[serde(default)]
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: VideoKind,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl TrailerRef {
    /// Only YouTube-hosted trailers can be played in a reel
    pub fn is_reel_trailer(&self) -> bool {
        self.site == "YouTube" && self.kind == VideoKind::Trailer
    }
}

/// First video usable as a reel trailer, in API order
pub fn select_reel_trailer(videos: Vec<TrailerRef>) -> Option<TrailerRef> {
    videos.into_iter().find(TrailerRef::is_reel_trailer)
}
