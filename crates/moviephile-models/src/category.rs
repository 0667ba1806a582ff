use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Curated list a feed or browse view is built from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListCategory {
    Trending,
    #[default]
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
    OnTheAir,
    AiringToday,
}

impl ListCategory {
    pub const ALL: [ListCategory; 7] = [
        ListCategory::Trending,
        ListCategory::Popular,
        ListCategory::TopRated,
        ListCategory::NowPlaying,
        ListCategory::Upcoming,
        ListCategory::OnTheAir,
        ListCategory::AiringToday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListCategory::Trending => "trending",
            ListCategory::Popular => "popular",
            ListCategory::TopRated => "top_rated",
            ListCategory::NowPlaying => "now_playing",
            ListCategory::Upcoming => "upcoming",
            ListCategory::OnTheAir => "on_the_air",
            ListCategory::AiringToday => "airing_today",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListCategory::Trending => "Trending",
            ListCategory::Popular => "Popular",
            ListCategory::TopRated => "Top Rated",
            ListCategory::NowPlaying => "Latest",
            ListCategory::Upcoming => "Coming Soon",
            ListCategory::OnTheAir => "On The Air",
            ListCategory::AiringToday => "Airing Today",
        }
    }
}

impl fmt::Display for ListCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "trending" => Ok(ListCategory::Trending),
            "popular" => Ok(ListCategory::Popular),
            "top_rated" | "toprated" => Ok(ListCategory::TopRated),
            "now_playing" | "nowplaying" | "latest" | "newrelease" => Ok(ListCategory::NowPlaying),
            "upcoming" => Ok(ListCategory::Upcoming),
            "on_the_air" | "ontheair" => Ok(ListCategory::OnTheAir),
            "airing_today" | "airingtoday" => Ok(ListCategory::AiringToday),
            other => Err(format!("Unknown category: {}", other)),
        }
    }
}
