use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Viewing status of a watchlist entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum WatchStatus {
    #[default]
    Plan,
    Watching,
    Watched,
}

impl WatchStatus {
    /// plan -> watching -> watched -> plan
    pub fn next(self) -> Self {
        match self {
            WatchStatus::Plan => WatchStatus::Watching,
            WatchStatus::Watching => WatchStatus::Watched,
            WatchStatus::Watched => WatchStatus::Plan,
        }
    }

    /// Progress forced by entering this status, if any
    pub fn implied_progress(self) -> Option<u8> {
        match self {
            WatchStatus::Plan => Some(0),
            WatchStatus::Watching => None,
            WatchStatus::Watched => Some(100),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::Plan => "plan",
            WatchStatus::Watching => "watching",
            WatchStatus::Watched => "watched",
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plan" => Ok(WatchStatus::Plan),
            "watching" => Ok(WatchStatus::Watching),
            "watched" => Ok(WatchStatus::Watched),
            other => Err(format!("Invalid status: {}. Use 'plan', 'watching', or 'watched'", other)),
        }
    }
}

/// Clamp a progress percentage into 0..=100
pub fn clamp_progress(progress: i64) -> u8 {
    progress.clamp(0, 100) as u8
}

/// A row of the remote watchlist table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    pub id: String,
    pub user_id: String,
    pub movie_id: u64,
    pub movie_title: String,
    #[serde(default)]
    pub movie_poster_path: Option<String>,
    pub status: WatchStatus,
    #[serde(default)]
    pub progress: u8,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; the server assigns `id` and `created_at`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewWatchlistEntry {
    pub user_id: String,
    pub movie_id: u64,
    pub movie_title: String,
    pub movie_poster_path: Option<String>,
    pub status: WatchStatus,
    pub progress: u8,
}
