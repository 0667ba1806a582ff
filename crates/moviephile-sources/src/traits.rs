use async_trait::async_trait;
use moviephile_models::{
    ContentDetail, ContentItem, ListCategory, MediaType, NewWatchlistEntry, Page, Season,
    TrailerRef, WatchStatus, WatchlistEntry,
};
use crate::error::SourceError;

/// Read-only access to the movie/TV metadata catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn source_name(&self) -> &str;

    async fn list(
        &self,
        category: ListCategory,
        media_type: MediaType,
        page: u32,
    ) -> Result<Page<ContentItem>, SourceError>;

    async fn discover_by_genre(
        &self,
        media_type: MediaType,
        genre_id: u32,
        page: u32,
    ) -> Result<Page<ContentItem>, SourceError>;

    async fn search(&self, query: &str, page: u32) -> Result<Page<ContentItem>, SourceError>;

    /// Detail record with videos, similar titles and reviews appended
    async fn detail(&self, media_type: MediaType, id: u64) -> Result<ContentDetail, SourceError>;

    async fn videos(&self, media_type: MediaType, id: u64) -> Result<Vec<TrailerRef>, SourceError>;

    async fn season(&self, show_id: u64, season_number: u32) -> Result<Season, SourceError>;
}

/// Remote watchlist table scoped by user identity and content id
#[async_trait]
pub trait WatchlistStore: Send + Sync {
    fn store_name(&self) -> &str;

    /// All rows for a user, newest first
    async fn fetch(&self, user_id: &str) -> Result<Vec<WatchlistEntry>, SourceError>;

    async fn get(&self, user_id: &str, movie_id: u64) -> Result<Option<WatchlistEntry>, SourceError>;

    async fn contains(&self, user_id: &str, movie_id: u64) -> Result<bool, SourceError> {
        Ok(self.get(user_id, movie_id).await?.is_some())
    }

    async fn insert(&self, entry: &NewWatchlistEntry) -> Result<WatchlistEntry, SourceError>;

    async fn delete(&self, user_id: &str, movie_id: u64) -> Result<(), SourceError>;

    async fn update_status(
        &self,
        user_id: &str,
        movie_id: u64,
        status: WatchStatus,
    ) -> Result<(), SourceError>;

    async fn update_progress(
        &self,
        user_id: &str,
        movie_id: u64,
        progress: u8,
    ) -> Result<(), SourceError>;
}
