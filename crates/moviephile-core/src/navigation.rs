use serde::Serialize;
use std::fmt;

/// Minimum horizontal travel, in pixels, for a touch to count as a swipe
pub const MIN_SWIPE_DISTANCE: f32 = 50.0;

/// Top-level mobile screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Destination {
    Home,
    Reels,
    Watchlist,
    Profile,
}

/// Order screens are visited when swiping left
pub const SWIPE_ORDER: [Destination; 4] = [
    Destination::Home,
    Destination::Reels,
    Destination::Watchlist,
    Destination::Profile,
];

impl Destination {
    pub fn position(self) -> usize {
        match self {
            Destination::Home => 0,
            Destination::Reels => 1,
            Destination::Watchlist => 2,
            Destination::Profile => 3,
        }
    }

    /// None on the last screen
    pub fn next(self) -> Option<Self> {
        SWIPE_ORDER.get(self.position() + 1).copied()
    }

    /// None on the first screen
    pub fn previous(self) -> Option<Self> {
        self.position()
            .checked_sub(1)
            .and_then(|i| SWIPE_ORDER.get(i).copied())
    }

    pub fn route(self) -> &'static str {
        match self {
            Destination::Home => "/mobile",
            Destination::Reels => "/reels",
            Destination::Watchlist => "/m/watchlist",
            Destination::Profile => "/m/profile",
        }
    }

    pub fn from_route(route: &str) -> Option<Self> {
        SWIPE_ORDER.into_iter().find(|d| d.route() == route)
    }

    pub fn label(self) -> &'static str {
        match self {
            Destination::Home => "Home",
            Destination::Reels => "Reels",
            Destination::Watchlist => "Watchlist",
            Destination::Profile => "Profile",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tracks one horizontal touch gesture
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    start_x: Option<f32>,
    end_x: Option<f32>,
    min_distance: f32,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(MIN_SWIPE_DISTANCE)
    }
}

impl SwipeTracker {
    pub fn new(min_distance: f32) -> Self {
        Self {
            start_x: None,
            end_x: None,
            min_distance,
        }
    }

    pub fn touch_start(&mut self, x: f32) {
        self.start_x = Some(x);
        self.end_x = None;
    }

    pub fn touch_move(&mut self, x: f32) {
        self.end_x = Some(x);
    }

    /// Finish the gesture. Left swipes go forward, right swipes go back; a tap
    /// without movement or a short drag yields None.
    pub fn touch_end(&mut self, current: Destination) -> Option<Destination> {
        let (start, end) = (self.start_x.take()?, self.end_x.take()?);
        let distance = start - end;
        if distance > self.min_distance {
            current.next()
        } else if distance < -self.min_distance {
            current.previous()
        } else {
            None
        }
    }
}
