//! In-memory sources and a recording player shared by the unit tests

use async_trait::async_trait;
use chrono::Utc;
use moviephile_models::{
    ContentDetail, ContentItem, ListCategory, MediaType, NewWatchlistEntry, Page, Results, Season,
    TrailerRef, VideoKind, WatchStatus, WatchlistEntry,
};
use moviephile_sources::{CatalogSource, PlayerCommand, SourceError, WatchlistStore};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;
use crate::feed::PlayerSurface;

pub fn item(id: u64) -> ContentItem {
    ContentItem {
        id,
        title: format!("Title {}", id),
        overview: String::new(),
        poster_path: Some(format!("/poster{}.jpg", id)),
        backdrop_path: None,
        release_date: Some("2024-05-01".to_string()),
        vote_average: 7.5,
        genre_ids: vec![28],
        popularity: 10.0,
        media_type: MediaType::Movie,
    }
}

pub fn items(ids: std::ops::RangeInclusive<u64>) -> Vec<ContentItem> {
    ids.map(item).collect()
}

pub fn trailer(key: &str) -> TrailerRef {
    TrailerRef {
        id: format!("v-{}", key),
        key: key.to_string(),
        name: "Official Trailer".to_string(),
        site: "YouTube".to_string(),
        kind: VideoKind::Trailer,
        size: Some(1080),
        published_at: None,
    }
}

/// Catalog that serves canned pages and gives every item a trailer unless told otherwise
#[derive(Default)]
pub struct FakeCatalog {
    pages: HashMap<(ListCategory, u32), (u32, Vec<ContentItem>)>,
    failing_pages: HashSet<(ListCategory, u32)>,
    without_trailer: HashSet<u64>,
    failing_videos: HashSet<u64>,
    search_failures: AtomicU32,
    list_calls: AtomicUsize,
    search_calls: AtomicUsize,
    video_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(
        mut self,
        category: ListCategory,
        page: u32,
        total_pages: u32,
        results: Vec<ContentItem>,
    ) -> Self {
        self.pages.insert((category, page), (total_pages, results));
        self
    }

    pub fn with_failing_page(mut self, category: ListCategory, page: u32) -> Self {
        self.failing_pages.insert((category, page));
        self
    }

    pub fn without_trailer(mut self, id: u64) -> Self {
        self.without_trailer.insert(id);
        self
    }

    pub fn with_failing_videos(mut self, id: u64) -> Self {
        self.failing_videos.insert(id);
        self
    }

    pub fn with_search_failures(self, count: u32) -> Self {
        self.search_failures.store(count, Ordering::SeqCst);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn video_calls(&self) -> usize {
        self.video_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    fn source_name(&self) -> &str {
        "fake"
    }

    async fn list(
        &self,
        category: ListCategory,
        _media_type: MediaType,
        page: u32,
    ) -> Result<Page<ContentItem>, SourceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_pages.contains(&(category, page)) {
            return Err(SourceError::Status {
                service: "fake",
                status: 503,
                body: String::new(),
            });
        }
        let (total_pages, results) = self
            .pages
            .get(&(category, page))
            .cloned()
            .unwrap_or((page, Vec::new()));
        Ok(Page {
            page,
            total_results: results.len() as u32,
            results,
            total_pages,
        })
    }

    async fn discover_by_genre(
        &self,
        _media_type: MediaType,
        _genre_id: u32,
        page: u32,
    ) -> Result<Page<ContentItem>, SourceError> {
        Ok(Page::empty(page))
    }

    async fn search(&self, _query: &str, page: u32) -> Result<Page<ContentItem>, SourceError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.search_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.search_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(SourceError::new("search unavailable"));
        }
        Ok(Page {
            page,
            results: vec![item(603)],
            total_pages: 1,
            total_results: 1,
        })
    }

    async fn detail(&self, media_type: MediaType, id: u64) -> Result<ContentDetail, SourceError> {
        let mut base = item(id);
        base.media_type = media_type;
        Ok(ContentDetail {
            item: base,
            runtime: Some(120),
            genres: Vec::new(),
            tagline: None,
            status: None,
            number_of_seasons: None,
            videos: Results::default(),
            similar: Results::default(),
            reviews: Results::default(),
        })
    }

    async fn videos(&self, _media_type: MediaType, id: u64) -> Result<Vec<TrailerRef>, SourceError> {
        self.video_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_videos.contains(&id) {
            return Err(SourceError::new(format!("videos for {} unavailable", id)));
        }
        if self.without_trailer.contains(&id) {
            return Ok(Vec::new());
        }
        Ok(vec![trailer(&format!("yt{}", id))])
    }

    async fn season(&self, _show_id: u64, season_number: u32) -> Result<Season, SourceError> {
        Err(SourceError::new(format!("season {} not stubbed", season_number)))
    }
}

/// Watchlist table kept in memory, with switches to make writes fail
#[derive(Default)]
pub struct FakeStore {
    rows: Mutex<Vec<WatchlistEntry>>,
    fail_deletes: AtomicBool,
    fail_writes: AtomicBool,
    fetch_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row(self, user_id: &str, movie_id: u64, status: WatchStatus) -> Self {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().push(WatchlistEntry {
            id: format!("row-{}", id),
            user_id: user_id.to_string(),
            movie_id,
            movie_title: format!("Title {}", movie_id),
            movie_poster_path: None,
            status,
            progress: status.implied_progress().unwrap_or(40),
            created_at: Utc::now(),
        });
        self
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn row(&self, user_id: &str, movie_id: u64) -> Option<WatchlistEntry> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id && r.movie_id == movie_id)
            .cloned()
    }

    fn write_guard(&self) -> Result<(), SourceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SourceError::Status {
                service: "fake",
                status: 500,
                body: "write rejected".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl WatchlistStore for FakeStore {
    fn store_name(&self) -> &str {
        "fake"
    }

    async fn fetch(&self, user_id: &str) -> Result<Vec<WatchlistEntry>, SourceError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let mut rows: Vec<WatchlistEntry> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.reverse();
        Ok(rows)
    }

    async fn get(&self, user_id: &str, movie_id: u64) -> Result<Option<WatchlistEntry>, SourceError> {
        Ok(self.row(user_id, movie_id))
    }

    async fn insert(&self, entry: &NewWatchlistEntry) -> Result<WatchlistEntry, SourceError> {
        self.write_guard()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = WatchlistEntry {
            id: format!("row-{}", id),
            user_id: entry.user_id.clone(),
            movie_id: entry.movie_id,
            movie_title: entry.movie_title.clone(),
            movie_poster_path: entry.movie_poster_path.clone(),
            status: entry.status,
            progress: entry.progress,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn delete(&self, user_id: &str, movie_id: u64) -> Result<(), SourceError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(SourceError::new("delete rejected"));
        }
        self.write_guard()?;
        self.rows
            .lock()
            .unwrap()
            .retain(|r| !(r.user_id == user_id && r.movie_id == movie_id));
        Ok(())
    }

    async fn update_status(
        &self,
        user_id: &str,
        movie_id: u64,
        status: WatchStatus,
    ) -> Result<(), SourceError> {
        self.write_guard()?;
        for row in self.rows.lock().unwrap().iter_mut() {
            if row.user_id == user_id && row.movie_id == movie_id {
                row.status = status;
            }
        }
        Ok(())
    }

    async fn update_progress(
        &self,
        user_id: &str,
        movie_id: u64,
        progress: u8,
    ) -> Result<(), SourceError> {
        self.write_guard()?;
        for row in self.rows.lock().unwrap().iter_mut() {
            if row.user_id == user_id && row.movie_id == movie_id {
                row.progress = progress;
            }
        }
        Ok(())
    }
}

/// Player surface that remembers every command it was sent
#[derive(Debug, Default)]
pub struct RecordingPlayer {
    pub commands: Vec<(usize, PlayerCommand)>,
}

impl RecordingPlayer {
    pub fn take(&mut self) -> Vec<(usize, PlayerCommand)> {
        std::mem::take(&mut self.commands)
    }
}

impl PlayerSurface for RecordingPlayer {
    fn dispatch(&mut self, cell: usize, command: PlayerCommand) {
        self.commands.push((cell, command));
    }
}
