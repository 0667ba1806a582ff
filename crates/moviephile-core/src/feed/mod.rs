//! Vertical trailer feed: which reel plays, when controls show, and when the next
//! page is fetched.

mod controller;
mod loader;

#[cfg(test)]
mod tests;

pub use controller::{PageApplied, ReelFeed};
pub use loader::{FeedLoader, FeedSession};

use moviephile_config::FeedConfig;
use moviephile_models::{ContentItem, ListCategory, MediaType, TrailerRef};
use moviephile_sources::PlayerCommand;
use serde::Serialize;
use std::time::Duration;

/// Rendering state of one reel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellState {
    Hidden,
    VisiblePaused,
    VisiblePlaying,
}

/// A feed entry: a catalog item paired with its resolved trailer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReelCell {
    pub item: ContentItem,
    pub trailer: TrailerRef,
}

/// One-way channel to whatever renders the embedded players.
///
/// Dispatch is fire-and-forget; the feed never waits on or reads back player state.
pub trait PlayerSurface {
    fn dispatch(&mut self, cell: usize, command: PlayerCommand);
}

#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub category: ListCategory,
    pub media_type: MediaType,
    pub max_pages: u32,
    pub visibility_threshold: f32,
    pub startup_delay: Duration,
    pub controls_fade: Duration,
    pub max_items_per_page: Option<usize>,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self::from(&FeedConfig::default())
    }
}

impl From<&FeedConfig> for FeedSettings {
    fn from(config: &FeedConfig) -> Self {
        Self {
            category: config.category,
            media_type: config.media_type,
            max_pages: config.max_pages,
            visibility_threshold: config.visibility_threshold,
            startup_delay: Duration::from_millis(config.startup_delay_ms),
            controls_fade: Duration::from_millis(config.controls_fade_ms),
            max_items_per_page: config.max_items_per_page,
        }
    }
}

/// A page fetch the host should run and hand back through `ReelFeed::apply_page`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub category: ListCategory,
    pub media_type: MediaType,
    pub page: u32,
    generation: u64,
}

impl PageRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Reels resolved from one list page
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage {
    pub page: u32,
    pub total_pages: u32,
    pub cells: Vec<ReelCell>,
    /// Items left out because no trailer was found or the lookup failed
    pub dropped: usize,
}
