pub mod auth;
pub mod cache;
pub mod catalog;
pub mod error;
pub mod feed;
pub mod navigation;
pub mod watchlist;

#[cfg(test)]
mod testing;

pub use auth::{profile_for_email, AuthSession};
pub use cache::QueryCache;
pub use catalog::{CatalogKey, CatalogService, CatalogSettings};
pub use error::CoreError;
pub use feed::{
    CellState, FeedLoader, FeedPage, FeedSession, FeedSettings, PageApplied, PageRequest,
    PlayerSurface, ReelCell, ReelFeed,
};
pub use navigation::{Destination, SwipeTracker, MIN_SWIPE_DISTANCE, SWIPE_ORDER};
pub use watchlist::{ToggleOutcome, WatchlistSync};
