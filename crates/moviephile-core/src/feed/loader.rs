use futures::future::join_all;
use moviephile_models::{select_reel_trailer, ContentItem, ListCategory, MediaType};
use moviephile_sources::{CatalogSource, SourceError};
use tracing::debug;
use super::{FeedPage, FeedSettings, PageApplied, PageRequest, PlayerSurface, ReelCell, ReelFeed};

/// Turns list pages into reels by resolving a trailer for every item
pub struct FeedLoader<C> {
    catalog: C,
    max_items_per_page: Option<usize>,
}

impl<C: CatalogSource> FeedLoader<C> {
    pub fn new(catalog: C, max_items_per_page: Option<usize>) -> Self {
        Self {
            catalog,
            max_items_per_page,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Fetch one list page and keep the items with a YouTube trailer, in list order.
    ///
    /// Trailer lookups run concurrently; a failed lookup drops the item instead of
    /// failing the page.
    pub async fn fetch_page(&self, request: &PageRequest) -> Result<FeedPage, SourceError> {
        let list = self
            .catalog
            .list(request.category, request.media_type, request.page)
            .await?;
        let limit = self.max_items_per_page.unwrap_or(usize::MAX);
        let items: Vec<ContentItem> = list.results.into_iter().take(limit).collect();

        let lookups = items
            .iter()
            .map(|item| self.catalog.videos(request.media_type, item.id));
        let videos = join_all(lookups).await;

        let mut cells = Vec::with_capacity(items.len());
        let mut dropped = 0;
        for (item, result) in items.into_iter().zip(videos) {
            match result {
                Ok(videos) => match select_reel_trailer(videos) {
                    Some(trailer) => cells.push(ReelCell { item, trailer }),
                    None => dropped += 1,
                },
                Err(e) => {
                    debug!("Trailer lookup for {} failed: {}", item.id, e);
                    dropped += 1;
                }
            }
        }

        Ok(FeedPage {
            page: list.page,
            total_pages: list.total_pages,
            cells,
            dropped,
        })
    }
}

/// A feed wired to its loader, for hosts that fetch inline
pub struct FeedSession<C, P> {
    feed: ReelFeed<P>,
    loader: FeedLoader<C>,
}

impl<C: CatalogSource, P: PlayerSurface> FeedSession<C, P> {
    pub fn new(catalog: C, settings: FeedSettings, player: P) -> Self {
        let loader = FeedLoader::new(catalog, settings.max_items_per_page);
        Self {
            feed: ReelFeed::new(settings, player),
            loader,
        }
    }

    pub fn feed(&self) -> &ReelFeed<P> {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut ReelFeed<P> {
        &mut self.feed
    }

    pub fn loader(&self) -> &FeedLoader<C> {
        &self.loader
    }

    /// Load the first page. None when it was already loaded.
    pub async fn load_initial(&mut self) -> Option<PageApplied> {
        let request = self.feed.start()?;
        Some(self.run(request).await)
    }

    /// Load the next page if the feed wants one
    pub async fn on_sentinel_visible(&mut self) -> Option<PageApplied> {
        let request = self.feed.on_sentinel_visible()?;
        Some(self.run(request).await)
    }

    /// Reset to another selection and load its first page
    pub async fn switch(&mut self, category: ListCategory, media_type: MediaType) -> Option<PageApplied> {
        self.feed.set_selection(category, media_type);
        self.load_initial().await
    }

    async fn run(&mut self, request: PageRequest) -> PageApplied {
        let outcome = self.loader.fetch_page(&request).await;
        self.feed.apply_page(request, outcome)
    }
}
