use super::*;
use crate::testing::{item, items, trailer, FakeCatalog, RecordingPlayer};
use moviephile_models::{ListCategory, MediaType};
use moviephile_sources::{PlayerCommand, SourceError};
use std::time::{Duration, Instant};

fn settings(startup_delay_ms: u64) -> FeedSettings {
    FeedSettings {
        startup_delay: Duration::from_millis(startup_delay_ms),
        ..FeedSettings::default()
    }
}

fn cells(count: u64) -> Vec<ReelCell> {
    (1..=count)
        .map(|id| ReelCell {
            item: item(id),
            trailer: trailer(&format!("yt{}", id)),
        })
        .collect()
}

fn loaded_feed(count: u64, settings: FeedSettings) -> ReelFeed<RecordingPlayer> {
    let mut feed = ReelFeed::new(settings, RecordingPlayer::default());
    let request = feed.start().unwrap();
    let page = FeedPage {
        page: 1,
        total_pages: 5,
        cells: cells(count),
        dropped: 0,
    };
    assert_eq!(feed.apply_page(request, Ok(page)), PageApplied::Appended { added: count as usize });
    feed
}

fn playing_count<P: PlayerSurface>(feed: &ReelFeed<P>) -> usize {
    (0..feed.cells().len())
        .filter(|i| feed.state_of(*i) == CellState::VisiblePlaying)
        .count()
}

#[test]
fn test_visible_cell_plays_immediately_without_delay() {
    let mut feed = loaded_feed(3, settings(0));
    let now = Instant::now();

    assert_eq!(feed.state_of(0), CellState::Hidden);
    feed.on_visibility(0, 0.95, now);

    assert_eq!(feed.state_of(0), CellState::VisiblePlaying);
    assert_eq!(feed.playing_index(), Some(0));
    assert_eq!(feed.player_mut().take(), vec![(0, PlayerCommand::Play)]);
}

#[test]
fn test_out_of_range_ratios_are_clamped() {
    let mut feed = loaded_feed(3, settings(0));
    let now = Instant::now();

    feed.on_visibility(0, f32::NAN, now);
    assert_eq!(feed.state_of(0), CellState::Hidden);
    assert!(feed.player().commands.is_empty());

    feed.on_visibility(1, 1.7, now);
    feed.on_visibility(2, 1.0, now);
    // 1.7 is stored as 1.0 and ties keep the current cell
    assert_eq!(feed.playing_index(), Some(1));

    feed.on_visibility(1, -0.5, now);
    assert_eq!(feed.playing_index(), Some(2));
}

#[test]
fn test_startup_delay_defers_play() {
    let mut feed = loaded_feed(3, settings(500));
    let now = Instant::now();

    feed.on_visibility(1, 1.0, now);
    assert_eq!(feed.active_index(), Some(1));
    assert_eq!(feed.state_of(1), CellState::VisiblePaused);
    assert!(feed.is_loading());

    feed.tick(now + Duration::from_millis(499));
    assert_eq!(feed.playing_index(), None);
    assert!(feed.player().commands.is_empty());

    feed.tick(now + Duration::from_millis(500));
    assert_eq!(feed.playing_index(), Some(1));
    assert_eq!(feed.player().commands, vec![(1, PlayerCommand::Play)]);

    feed.player_ready(1);
    assert!(!feed.is_loading());
}

#[test]
fn test_below_threshold_stops_in_same_call() {
    let mut feed = loaded_feed(3, settings(0));
    let now = Instant::now();
    feed.on_visibility(2, 0.9, now);
    feed.player_mut().take();

    feed.on_visibility(2, 0.79, now);

    assert_eq!(feed.state_of(2), CellState::Hidden);
    assert_eq!(feed.playing_index(), None);
    assert_eq!(feed.active_index(), None);
    assert_eq!(
        feed.player().commands,
        vec![(2, PlayerCommand::Pause), (2, PlayerCommand::Stop)]
    );
}

#[test]
fn test_scroll_from_three_to_seven() {
    let mut feed = loaded_feed(10, settings(500));
    let start = Instant::now();
    feed.on_visibility(3, 1.0, start);
    feed.tick(start + Duration::from_millis(600));
    assert_eq!(feed.playing_index(), Some(3));

    // Fast scroll: each intermediate cell crosses the threshold only briefly
    let mut now = start + Duration::from_secs(2);
    feed.on_visibility(3, 0.3, now);
    for index in 4..=6 {
        feed.on_visibility(index, 0.9, now);
        now += Duration::from_millis(50);
        feed.tick(now);
        feed.on_visibility(index, 0.2, now);
    }
    feed.on_visibility(7, 1.0, now);
    feed.tick(now + Duration::from_millis(500));

    assert_eq!(feed.playing_index(), Some(7));
    let commands = feed.player().commands.clone();
    assert!(commands.contains(&(3, PlayerCommand::Stop)));
    for index in 4..=6 {
        assert!(!commands.contains(&(index, PlayerCommand::Play)));
    }
    assert_eq!(
        commands.iter().filter(|(_, c)| *c == PlayerCommand::Play).count(),
        2
    );
    assert_eq!(commands.last(), Some(&(7, PlayerCommand::Play)));
}

#[test]
fn test_most_visible_wins_and_ties_keep_current() {
    let mut feed = loaded_feed(4, settings(0));
    let now = Instant::now();

    feed.on_visibility(0, 0.85, now);
    assert_eq!(feed.active_index(), Some(0));

    feed.on_visibility(1, 0.85, now);
    assert_eq!(feed.active_index(), Some(0));

    feed.on_visibility(1, 0.95, now);
    assert_eq!(feed.active_index(), Some(1));
    assert_eq!(feed.state_of(0), CellState::VisiblePaused);
    assert_eq!(playing_count(&feed), 1);
}

#[test]
fn test_at_most_one_playing_for_any_sequence() {
    let mut feed = loaded_feed(6, settings(200));
    let mut now = Instant::now();
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;

    for _ in 0..500 {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let index = (seed >> 33) as usize % 6;
        let ratio = ((seed >> 13) % 101) as f32 / 100.0;
        match seed % 4 {
            0 => {
                feed.tap(index, now);
            }
            1 => feed.interact(now),
            _ => feed.on_visibility(index, ratio, now),
        }
        now += Duration::from_millis((seed >> 40) % 300);
        feed.tick(now);

        assert!(playing_count(&feed) <= 1);
        if let Some(playing) = feed.playing_index() {
            assert_eq!(feed.active_index(), Some(playing));
            assert_eq!(feed.state_of(playing), CellState::VisiblePlaying);
        }
    }
}

#[test]
fn test_tap_pauses_and_resumes() {
    let mut feed = loaded_feed(2, settings(0));
    let now = Instant::now();
    feed.on_visibility(0, 1.0, now);
    feed.player_mut().take();

    assert_eq!(feed.tap(0, now), Some(CellState::VisiblePaused));
    assert!(feed.play_affordance_visible());
    assert_eq!(feed.playing_index(), None);
    assert_eq!(feed.state_of(0), CellState::VisiblePaused);

    // Controls stay pinned while paused
    feed.tick(now + Duration::from_secs(10));
    assert!(feed.controls_visible());

    let resumed = now + Duration::from_secs(10);
    assert_eq!(feed.tap(0, resumed), Some(CellState::VisiblePlaying));
    assert!(!feed.play_affordance_visible());
    assert_eq!(
        feed.player().commands,
        vec![(0, PlayerCommand::Pause), (0, PlayerCommand::Play)]
    );
}

#[test]
fn test_tap_on_inactive_cell_is_ignored() {
    let mut feed = loaded_feed(3, settings(0));
    let now = Instant::now();
    feed.on_visibility(0, 1.0, now);
    feed.player_mut().take();

    assert_eq!(feed.tap(1, now), None);
    assert_eq!(feed.playing_index(), Some(0));
    assert!(feed.player().commands.is_empty());
}

#[test]
fn test_controls_fade_while_playing() {
    let mut feed = loaded_feed(2, settings(0));
    let now = Instant::now();
    feed.on_visibility(0, 1.0, now);
    assert!(feed.controls_visible());

    feed.tick(now + Duration::from_millis(2999));
    assert!(feed.controls_visible());
    feed.tick(now + Duration::from_millis(3000));
    assert!(!feed.controls_visible());

    let later = now + Duration::from_secs(5);
    feed.interact(later);
    assert!(feed.controls_visible());
    feed.tick(later + Duration::from_secs(3));
    assert!(!feed.controls_visible());
}

#[test]
fn test_sentinel_while_in_flight_issues_one_request() {
    let mut feed = loaded_feed(3, settings(0));

    let request = feed.on_sentinel_visible().unwrap();
    assert_eq!(request.page, 2);
    assert!(feed.is_fetching());
    for _ in 0..5 {
        assert!(feed.on_sentinel_visible().is_none());
    }
    assert_eq!(feed.pages_requested(), 2);

    let page = FeedPage {
        page: 2,
        total_pages: 5,
        cells: cells(2),
        dropped: 0,
    };
    assert_eq!(feed.apply_page(request, Ok(page)), PageApplied::Appended { added: 2 });
    assert_eq!(feed.cells().len(), 5);
    assert_eq!(feed.on_sentinel_visible().map(|r| r.page), Some(3));
}

#[test]
fn test_page_applied_twice_is_appended_once() {
    let mut feed = loaded_feed(3, settings(0));
    let request = feed.on_sentinel_visible().unwrap();
    let page = FeedPage {
        page: 2,
        total_pages: 5,
        cells: cells(2),
        dropped: 0,
    };

    let first = feed.apply_page(request.clone(), Ok(page.clone()));
    assert_eq!(first, PageApplied::Appended { added: 2 });
    assert_eq!(feed.apply_page(request, Ok(page)), PageApplied::Stale);
    assert_eq!(feed.cells().len(), 5);
    assert_eq!(feed.on_sentinel_visible().map(|r| r.page), Some(3));
}

#[test]
fn test_failed_page_can_be_retried() {
    let mut feed = loaded_feed(3, settings(0));
    let request = feed.on_sentinel_visible().unwrap();

    let applied = feed.apply_page(request, Err(SourceError::new("timeout")));
    assert_eq!(applied, PageApplied::Failed);
    assert_eq!(feed.cells().len(), 3);
    assert!(!feed.is_fetching());

    let retry = feed.on_sentinel_visible().unwrap();
    assert_eq!(retry.page, 2);
    assert_eq!(feed.pages_requested(), 3);
}

#[test]
fn test_last_page_exhausts_feed() {
    let mut feed = ReelFeed::new(settings(0), RecordingPlayer::default());
    let request = feed.start().unwrap();
    let page = FeedPage {
        page: 1,
        total_pages: 1,
        cells: cells(2),
        dropped: 0,
    };
    feed.apply_page(request, Ok(page));

    assert!(feed.is_exhausted());
    assert!(!feed.can_load_more());
    assert!(feed.on_sentinel_visible().is_none());
}

#[test]
fn test_category_switch_discards_stale_page() {
    let mut feed = loaded_feed(3, settings(0));
    let now = Instant::now();
    feed.on_visibility(0, 1.0, now);
    let request = feed.on_sentinel_visible().unwrap();

    feed.set_category(ListCategory::TopRated);
    assert!(feed.cells().is_empty());
    assert_eq!(feed.playing_index(), None);
    assert!(feed.player().commands.contains(&(0, PlayerCommand::Stop)));

    let page = FeedPage {
        page: 2,
        total_pages: 5,
        cells: cells(4),
        dropped: 0,
    };
    assert_eq!(feed.apply_page(request, Ok(page)), PageApplied::Stale);
    assert!(feed.cells().is_empty());

    let fresh = feed.start().unwrap();
    assert_eq!(fresh.category, ListCategory::TopRated);
    assert_eq!(fresh.page, 1);
    assert_eq!(feed.pages_requested(), 1);
}

#[tokio::test]
async fn test_loader_keeps_items_with_trailers_in_order() {
    let catalog = FakeCatalog::new()
        .with_page(ListCategory::Popular, 1, 10, items(1..=20))
        .without_trailer(4)
        .with_failing_videos(15);
    let loader = FeedLoader::new(catalog, None);
    let mut feed = ReelFeed::new(settings(0), RecordingPlayer::default());

    let request = feed.start().unwrap();
    let page = loader.fetch_page(&request).await.unwrap();
    assert_eq!(page.cells.len(), 18);
    assert_eq!(page.dropped, 2);

    let ids: Vec<u64> = page.cells.iter().map(|c| c.item.id).collect();
    let expected: Vec<u64> = (1..=20).filter(|id| *id != 4 && *id != 15).collect();
    assert_eq!(ids, expected);
    assert_eq!(page.cells[0].trailer.key, "yt1");

    feed.apply_page(request, Ok(page));
    assert_eq!(feed.cells().len(), 18);
}

#[tokio::test]
async fn test_loader_caps_fan_out() {
    let catalog = FakeCatalog::new().with_page(ListCategory::Popular, 1, 3, items(1..=20));
    let loader = FeedLoader::new(catalog, Some(10));
    let mut feed = ReelFeed::new(settings(0), RecordingPlayer::default());

    let request = feed.start().unwrap();
    let page = loader.fetch_page(&request).await.unwrap();
    assert_eq!(page.cells.len(), 10);
    assert_eq!(loader.catalog().video_calls(), 10);
}

#[tokio::test]
async fn test_session_never_exceeds_page_budget() {
    let mut catalog = FakeCatalog::new();
    for page in 1..=10 {
        let first = (page as u64 - 1) * 5 + 1;
        catalog = catalog.with_page(ListCategory::Popular, page, 10, items(first..=first + 4));
    }
    let mut session = FeedSession::new(
        catalog,
        FeedSettings {
            max_pages: 3,
            ..settings(0)
        },
        RecordingPlayer::default(),
    );

    assert_eq!(session.load_initial().await, Some(PageApplied::Appended { added: 5 }));
    assert_eq!(session.load_initial().await, None);
    for _ in 0..10 {
        session.on_sentinel_visible().await;
    }

    assert_eq!(session.loader().catalog().list_calls(), 3);
    assert_eq!(session.feed().cells().len(), 15);
    assert!(!session.feed().can_load_more());
}

#[tokio::test]
async fn test_session_failed_fetch_counts_against_budget() {
    let catalog = FakeCatalog::new()
        .with_page(ListCategory::Popular, 1, 10, items(1..=5))
        .with_failing_page(ListCategory::Popular, 2);
    let mut session = FeedSession::new(
        catalog,
        FeedSettings {
            max_pages: 3,
            ..settings(0)
        },
        RecordingPlayer::default(),
    );

    session.load_initial().await;
    assert_eq!(session.on_sentinel_visible().await, Some(PageApplied::Failed));
    assert_eq!(session.on_sentinel_visible().await, Some(PageApplied::Failed));
    assert_eq!(session.on_sentinel_visible().await, None);
    assert_eq!(session.loader().catalog().list_calls(), 3);
    assert_eq!(session.feed().cells().len(), 5);
}

#[tokio::test]
async fn test_session_switch_reloads() {
    let catalog = FakeCatalog::new()
        .with_page(ListCategory::Popular, 1, 10, items(1..=3))
        .with_page(ListCategory::Trending, 1, 10, items(50..=51));
    let mut session = FeedSession::new(catalog, settings(0), RecordingPlayer::default());

    session.load_initial().await;
    let applied = session.switch(ListCategory::Trending, MediaType::Movie).await;
    assert_eq!(applied, Some(PageApplied::Appended { added: 2 }));
    assert_eq!(session.feed().cells()[0].item.id, 50);
    assert_eq!(session.feed().category(), ListCategory::Trending);
}
