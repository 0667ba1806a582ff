use moviephile_models::{ListCategory, MediaType};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const TMDB_API_KEY_ENV: &str = "MOVIEPHILE_TMDB_API_KEY";
pub const SUPABASE_URL_ENV: &str = "MOVIEPHILE_SUPABASE_URL";
pub const SUPABASE_ANON_KEY_ENV: &str = "MOVIEPHILE_SUPABASE_ANON_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub supabase: Option<SupabaseConfig>,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub watchlist: WatchlistConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Metadata API access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// Backend-as-a-service holding the watchlist table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    #[serde(default = "default_watchlist_table")]
    pub table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub category: ListCategory,
    #[serde(default)]
    pub media_type: MediaType,
    /// Hard cap on page fetches per feed session
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Fraction of a reel that must be on screen before it autoplays
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f32,
    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,
    #[serde(default = "default_controls_fade_ms")]
    pub controls_fade_ms: u64,
    /// Only resolve trailers for the first N items of each page
    #[serde(default)]
    pub max_items_per_page: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    #[serde(default = "default_search_retries")]
    pub retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistConfig {
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_watchlist_table() -> String {
    "watchlist".to_string()
}

fn default_max_pages() -> u32 {
    5
}

fn default_visibility_threshold() -> f32 {
    0.8
}

fn default_startup_delay_ms() -> u64 {
    500
}

fn default_controls_fade_ms() -> u64 {
    3000
}

fn default_min_query_len() -> usize {
    2
}

fn default_search_retries() -> u32 {
    1
}

fn default_stale_after_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_tmdb_base_url(),
            language: None,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            category: ListCategory::default(),
            media_type: MediaType::default(),
            max_pages: default_max_pages(),
            visibility_threshold: default_visibility_threshold(),
            startup_delay_ms: default_startup_delay_ms(),
            controls_fade_ms: default_controls_fade_ms(),
            max_items_per_page: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: default_min_query_len(),
            retries: default_search_retries(),
        }
    }
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            stale_after_secs: default_stale_after_secs(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if present (defaults otherwise), then apply env overrides
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `MOVIEPHILE_*` overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(TMDB_API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.tmdb.api_key = key;
        }

        let url = lookup(SUPABASE_URL_ENV).filter(|v| !v.is_empty());
        let anon_key = lookup(SUPABASE_ANON_KEY_ENV).filter(|v| !v.is_empty());
        match (&mut self.supabase, url, anon_key) {
            (Some(supabase), url, anon_key) => {
                if let Some(url) = url {
                    supabase.url = url;
                }
                if let Some(anon_key) = anon_key {
                    supabase.anon_key = anon_key;
                }
            }
            (None, Some(url), Some(anon_key)) => {
                self.supabase = Some(SupabaseConfig {
                    url,
                    anon_key,
                    table: default_watchlist_table(),
                });
            }
            _ => {}
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tmdb.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "tmdb.api_key is required (set it in config.toml or {})",
                TMDB_API_KEY_ENV
            ));
        }

        if !(self.feed.visibility_threshold > 0.0 && self.feed.visibility_threshold <= 1.0) {
            return Err(anyhow::anyhow!("feed.visibility_threshold must be in (0, 1]"));
        }

        if self.feed.max_pages == 0 {
            return Err(anyhow::anyhow!("feed.max_pages must be at least 1"));
        }

        if let Some(supabase) = &self.supabase {
            if !supabase.url.starts_with("http") {
                return Err(anyhow::anyhow!("supabase.url must be an http(s) URL"));
            }
            if supabase.anon_key.trim().is_empty() {
                return Err(anyhow::anyhow!("supabase.anon_key cannot be empty"));
            }
        }

        Ok(())
    }
}
