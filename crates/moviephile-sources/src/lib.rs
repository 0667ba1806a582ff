pub mod error;
pub mod factory;
pub mod supabase;
pub mod tmdb;
pub mod traits;
pub mod youtube;

pub use error::SourceError;
pub use factory::{build_catalog, build_watchlist_store, http_client};
pub use reqwest::Client as HttpClient;
pub use supabase::SupabaseClient;
pub use tmdb::TmdbClient;
pub use traits::{CatalogSource, WatchlistStore};
pub use youtube::PlayerCommand;
