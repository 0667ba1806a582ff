use moviephile_config::{Config, SearchConfig};
use moviephile_models::{ContentDetail, ContentItem, ListCategory, MediaType, Page, Season, TrailerRef};
use moviephile_sources::{CatalogSource, SourceError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use crate::cache::QueryCache;
use crate::error::CoreError;

/// Full request key of a cached catalog page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogKey {
    List {
        category: ListCategory,
        media_type: MediaType,
        page: u32,
    },
    Genre {
        media_type: MediaType,
        genre_id: u32,
        page: u32,
    },
    Search {
        query: String,
        page: u32,
    },
}

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub min_query_len: usize,
    pub search_retries: u32,
    pub stale_after: Duration,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            search_retries: 1,
            stale_after: Duration::from_secs(300),
        }
    }
}

impl CatalogSettings {
    pub fn from_config(config: &Config) -> Self {
        Self::from_search(&config.search)
    }

    pub fn from_search(search: &SearchConfig) -> Self {
        Self {
            min_query_len: search.min_query_len,
            search_retries: search.retries,
            ..Self::default()
        }
    }
}

/// Cached read access to the catalog
pub struct CatalogService<C> {
    source: C,
    settings: CatalogSettings,
    pages: QueryCache<CatalogKey, Page<ContentItem>>,
    details: QueryCache<(MediaType, u64), ContentDetail>,
}

impl<C: CatalogSource> CatalogService<C> {
    pub fn new(source: C, settings: CatalogSettings) -> Self {
        let stale_after = settings.stale_after;
        Self {
            source,
            settings,
            pages: QueryCache::new(stale_after),
            details: QueryCache::new(stale_after),
        }
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    pub async fn list(
        &mut self,
        category: ListCategory,
        media_type: MediaType,
        page: u32,
    ) -> Result<Page<ContentItem>, CoreError> {
        let key = CatalogKey::List {
            category,
            media_type,
            page,
        };
        if let Some(hit) = self.fresh_page(&key) {
            return Ok(hit);
        }
        let fetched = self.source.list(category, media_type, page).await?;
        Ok(self.store_page(key, fetched))
    }

    pub async fn by_genre(
        &mut self,
        media_type: MediaType,
        genre_id: u32,
        page: u32,
    ) -> Result<Page<ContentItem>, CoreError> {
        let key = CatalogKey::Genre {
            media_type,
            genre_id,
            page,
        };
        if let Some(hit) = self.fresh_page(&key) {
            return Ok(hit);
        }
        let fetched = self.source.discover_by_genre(media_type, genre_id, page).await?;
        Ok(self.store_page(key, fetched))
    }

    /// Movie search. Short queries return an empty page without a request.
    pub async fn search(&mut self, query: &str, page: u32) -> Result<Page<ContentItem>, CoreError> {
        let query = query.trim();
        if query.chars().count() < self.settings.min_query_len {
            debug!("Search query '{}' too short, skipping request", query);
            return Ok(Page::empty(page));
        }

        let key = CatalogKey::Search {
            query: query.to_string(),
            page,
        };
        if let Some(hit) = self.fresh_page(&key) {
            return Ok(hit);
        }

        let mut attempt = 0;
        let fetched = loop {
            match self.source.search(query, page).await {
                Ok(fetched) => break fetched,
                Err(e) if attempt < self.settings.search_retries => {
                    attempt += 1;
                    warn!("Search for '{}' failed (attempt {}): {}. Retrying", query, attempt, e);
                }
                Err(e) => return Err(e.into()),
            }
        };
        Ok(self.store_page(key, fetched))
    }

    pub async fn detail(&mut self, media_type: MediaType, id: u64) -> Result<ContentDetail, CoreError> {
        let key = (media_type, id);
        if let Some(hit) = self.details.get_fresh(&key, Instant::now()) {
            return Ok(hit.clone());
        }
        let detail = self.source.detail(media_type, id).await?;
        self.details.insert(key, detail.clone(), Instant::now());
        Ok(detail)
    }

    pub async fn videos(&self, media_type: MediaType, id: u64) -> Result<Vec<TrailerRef>, SourceError> {
        self.source.videos(media_type, id).await
    }

    pub async fn season(&self, show_id: u64, season_number: u32) -> Result<Season, CoreError> {
        Ok(self.source.season(show_id, season_number).await?)
    }

    /// Force the next read of every cached list to refetch
    pub fn invalidate_lists(&mut self) -> usize {
        self.pages
            .invalidate_where(|key| matches!(key, CatalogKey::List { .. }))
    }

    fn fresh_page(&self, key: &CatalogKey) -> Option<Page<ContentItem>> {
        let hit = self.pages.get_fresh(key, Instant::now()).cloned();
        if hit.is_some() {
            debug!("Catalog cache hit: {:?}", key);
        }
        hit
    }

    fn store_page(&mut self, key: CatalogKey, page: Page<ContentItem>) -> Page<ContentItem> {
        self.pages.insert(key, page.clone(), Instant::now());
        page
    }
}
