pub mod category;
pub mod content;
pub mod detail;
pub mod genre;
pub mod images;
pub mod user;
pub mod video;
pub mod watchlist;

pub use category::ListCategory;
pub use content::{ContentItem, MediaType, Page};
pub use detail::{AuthorDetails, ContentDetail, Episode, Genre, Results, Review, Season};
pub use genre::{genre_name, genre_names};
pub use images::{backdrop_url, poster_url, PLACEHOLDER_IMAGE};
pub use user::{User, UserStats};
pub use video::{select_reel_trailer, TrailerRef, VideoKind};
pub use watchlist::{clamp_progress, NewWatchlistEntry, WatchStatus, WatchlistEntry};
