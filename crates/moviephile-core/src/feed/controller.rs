use moviephile_models::{ListCategory, MediaType};
use moviephile_sources::{PlayerCommand, SourceError};
use std::time::Instant;
use tracing::{debug, info, trace, warn};
use super::{CellState, FeedPage, FeedSettings, PageRequest, PlayerSurface, ReelCell};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activity {
    /// Elected, waiting out the startup delay
    Starting { due: Instant },
    Playing,
    /// Paused by the user
    Paused,
}

#[derive(Debug, Clone, Copy)]
struct ActiveCell {
    index: usize,
    activity: Activity,
}

#[derive(Debug, Default)]
struct Controls {
    visible: bool,
    hide_at: Option<Instant>,
}

#[derive(Debug, Default)]
struct Pagination {
    generation: u64,
    next_page: u32,
    fetches_issued: u32,
    in_flight: bool,
    exhausted: bool,
}

/// What `apply_page` did with a fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageApplied {
    Appended { added: usize },
    /// The fetch failed; nothing was appended and the same page can be retried
    Failed,
    /// The request belonged to an earlier category selection
    Stale,
}

/// Single owner of the reel feed's state.
///
/// At most one cell is active, and only the active cell can be playing. The host
/// reports visibility ratios and user input; the feed drives the player surface and
/// answers rendering queries.
pub struct ReelFeed<P> {
    settings: FeedSettings,
    player: P,
    category: ListCategory,
    media_type: MediaType,
    cells: Vec<ReelCell>,
    ratios: Vec<f32>,
    active: Option<ActiveCell>,
    controls: Controls,
    loading: bool,
    pagination: Pagination,
}

impl<P: PlayerSurface> ReelFeed<P> {
    pub fn new(settings: FeedSettings, player: P) -> Self {
        Self {
            category: settings.category,
            media_type: settings.media_type,
            settings,
            player,
            cells: Vec::new(),
            ratios: Vec::new(),
            active: None,
            controls: Controls::default(),
            loading: false,
            pagination: Pagination {
                next_page: 1,
                ..Pagination::default()
            },
        }
    }

    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    pub fn category(&self) -> ListCategory {
        self.category
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn cells(&self) -> &[ReelCell] {
        &self.cells
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    // Visibility and playback

    /// Record how much of a cell is on screen and re-elect the active cell
    pub fn on_visibility(&mut self, index: usize, ratio: f32, now: Instant) {
        let Some(slot) = self.ratios.get_mut(index) else {
            debug!("Visibility report for unknown cell {}", index);
            return;
        };
        *slot = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        trace!("Cell {} visible ratio {:.2}", index, *slot);

        let elected = self.most_visible();
        let current = self.active.map(|a| a.index);
        if elected == current {
            return;
        }
        if let Some(previous) = current {
            self.stop(previous);
        }
        if let Some(index) = elected {
            self.activate(index, now);
        }
    }

    /// Advance timers: start a due reel, fade controls
    pub fn tick(&mut self, now: Instant) {
        if let Some(active) = self.active.as_mut() {
            if let Activity::Starting { due } = active.activity {
                if now >= due {
                    active.activity = Activity::Playing;
                    let index = active.index;
                    self.player.dispatch(index, PlayerCommand::Play);
                    self.show_controls(now);
                    debug!("Cell {} started playing", index);
                }
            }
        }

        if self.is_playing() && self.controls.visible {
            if let Some(hide_at) = self.controls.hide_at {
                if now >= hide_at {
                    self.controls.visible = false;
                    self.controls.hide_at = None;
                }
            }
        }
    }

    /// Toggle pause on the active cell. Returns the resulting state, or None when ignored.
    pub fn tap(&mut self, index: usize, now: Instant) -> Option<CellState> {
        let active = self.active.as_mut().filter(|a| a.index == index)?;
        match active.activity {
            Activity::Playing => {
                active.activity = Activity::Paused;
                self.player.dispatch(index, PlayerCommand::Pause);
                self.controls.visible = true;
                self.controls.hide_at = None;
                Some(CellState::VisiblePaused)
            }
            Activity::Paused | Activity::Starting { .. } => {
                active.activity = Activity::Playing;
                self.player.dispatch(index, PlayerCommand::Play);
                self.show_controls(now);
                Some(CellState::VisiblePlaying)
            }
        }
    }

    /// Any pointer or touch activity over the feed
    pub fn interact(&mut self, now: Instant) {
        self.show_controls(now);
    }

    /// The embedded player for `index` finished loading
    pub fn player_ready(&mut self, index: usize) {
        if self.active_index() == Some(index) {
            self.loading = false;
        }
    }

    pub fn state_of(&self, index: usize) -> CellState {
        match self.ratios.get(index) {
            Some(ratio) if *ratio >= self.settings.visibility_threshold => match self.active {
                Some(ActiveCell {
                    index: active,
                    activity: Activity::Playing,
                }) if active == index => CellState::VisiblePlaying,
                _ => CellState::VisiblePaused,
            },
            _ => CellState::Hidden,
        }
    }

    pub fn playing_index(&self) -> Option<usize> {
        self.active
            .filter(|a| a.activity == Activity::Playing)
            .map(|a| a.index)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.map(|a| a.index)
    }

    pub fn controls_visible(&self) -> bool {
        self.controls.visible
    }

    pub fn play_affordance_visible(&self) -> bool {
        matches!(self.active, Some(ActiveCell { activity: Activity::Paused, .. }))
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn is_playing(&self) -> bool {
        self.playing_index().is_some()
    }

    /// Most visible cell at or above the threshold; ties keep the current active cell
    fn most_visible(&self) -> Option<usize> {
        let current = self.active.map(|a| a.index);
        let mut best: Option<(usize, f32)> = None;
        for (index, &ratio) in self.ratios.iter().enumerate() {
            if ratio < self.settings.visibility_threshold {
                continue;
            }
            best = match best {
                None => Some((index, ratio)),
                Some((_, top)) if ratio > top => Some((index, ratio)),
                Some((_, top)) if ratio == top && current == Some(index) => Some((index, ratio)),
                keep => keep,
            };
        }
        best.map(|(index, _)| index)
    }

    fn activate(&mut self, index: usize, now: Instant) {
        self.loading = true;
        self.controls.visible = true;
        self.controls.hide_at = None;
        if self.settings.startup_delay.is_zero() {
            self.active = Some(ActiveCell {
                index,
                activity: Activity::Playing,
            });
            self.player.dispatch(index, PlayerCommand::Play);
            self.show_controls(now);
        } else {
            self.active = Some(ActiveCell {
                index,
                activity: Activity::Starting {
                    due: now + self.settings.startup_delay,
                },
            });
        }
        debug!("Cell {} is now active", index);
    }

    fn stop(&mut self, index: usize) {
        self.player.dispatch(index, PlayerCommand::Pause);
        self.player.dispatch(index, PlayerCommand::Stop);
        if self.active_index() == Some(index) {
            self.active = None;
        }
        self.loading = false;
        self.controls = Controls::default();
        debug!("Cell {} stopped", index);
    }

    fn show_controls(&mut self, now: Instant) {
        self.controls.visible = true;
        self.controls.hide_at = if self.is_playing() {
            Some(now + self.settings.controls_fade)
        } else {
            None
        };
    }

    // Pagination

    /// Request the first page of the current selection
    pub fn start(&mut self) -> Option<PageRequest> {
        if !self.cells.is_empty() {
            return None;
        }
        self.next_request()
    }

    /// The bottom sentinel scrolled into view
    pub fn on_sentinel_visible(&mut self) -> Option<PageRequest> {
        self.next_request()
    }

    fn next_request(&mut self) -> Option<PageRequest> {
        let pagination = &mut self.pagination;
        if pagination.in_flight {
            trace!("Page request already in flight");
            return None;
        }
        if pagination.exhausted {
            return None;
        }
        if pagination.fetches_issued >= self.settings.max_pages {
            debug!("Page budget of {} reached", self.settings.max_pages);
            return None;
        }
        pagination.in_flight = true;
        pagination.fetches_issued += 1;
        Some(PageRequest {
            category: self.category,
            media_type: self.media_type,
            page: pagination.next_page,
            generation: pagination.generation,
        })
    }

    /// Apply the outcome of a request previously handed out by this feed
    pub fn apply_page(
        &mut self,
        request: PageRequest,
        outcome: Result<FeedPage, SourceError>,
    ) -> PageApplied {
        if request.generation != self.pagination.generation
            || request.category != self.category
            || request.media_type != self.media_type
        {
            debug!(
                "Discarding page {} of {} from an earlier selection",
                request.page, request.category
            );
            return PageApplied::Stale;
        }
        if !self.pagination.in_flight || request.page != self.pagination.next_page {
            debug!(
                "Discarding page {} of {}, already applied or never requested",
                request.page, request.category
            );
            return PageApplied::Stale;
        }
        self.pagination.in_flight = false;

        match outcome {
            Ok(page) => {
                let added = page.cells.len();
                self.cells.extend(page.cells);
                self.ratios.resize(self.cells.len(), 0.0);
                self.pagination.next_page = request.page + 1;
                if page.page >= page.total_pages {
                    self.pagination.exhausted = true;
                }
                info!(
                    "Loaded {} reels from {} page {} ({} without trailers)",
                    added, request.category, request.page, page.dropped
                );
                PageApplied::Appended { added }
            }
            Err(e) => {
                warn!(
                    "Failed to load {} page {}: {}",
                    request.category, request.page, e
                );
                PageApplied::Failed
            }
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.pagination.in_flight
    }

    pub fn is_exhausted(&self) -> bool {
        self.pagination.exhausted
    }

    pub fn pages_requested(&self) -> u32 {
        self.pagination.fetches_issued
    }

    pub fn can_load_more(&self) -> bool {
        !self.pagination.exhausted && self.pagination.fetches_issued < self.settings.max_pages
    }

    /// Switch category, keeping the media type
    pub fn set_category(&mut self, category: ListCategory) {
        self.set_selection(category, self.media_type);
    }

    /// Reset to a new category and media type, stopping any active reel first
    pub fn set_selection(&mut self, category: ListCategory, media_type: MediaType) {
        if let Some(index) = self.active_index() {
            self.stop(index);
        }
        self.category = category;
        self.media_type = media_type;
        self.cells.clear();
        self.ratios.clear();
        self.pagination = Pagination {
            generation: self.pagination.generation + 1,
            next_page: 1,
            ..Pagination::default()
        };
        info!("Feed switched to {} {}", category, media_type);
    }
}
