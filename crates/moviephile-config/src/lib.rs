pub mod config;
pub mod paths;
pub mod session;

pub use config::{Config, FeedConfig, HttpConfig, SearchConfig, SupabaseConfig, TmdbConfig, WatchlistConfig};
pub use paths::{PathManager, container_base_path};
pub use session::SessionStore;
