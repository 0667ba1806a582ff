pub mod auth;
pub mod catalog;
pub mod config;
pub mod prompts;
pub mod reels;
pub mod watchlist;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use moviephile_config::{Config, PathManager, SessionStore};
use moviephile_core::{AuthSession, CatalogService, CatalogSettings, WatchlistSync};
use moviephile_sources::{
    build_catalog, build_watchlist_store, http_client, HttpClient, SupabaseClient, TmdbClient,
};
use std::sync::Arc;
use std::time::Duration;

/// Paths and validated configuration shared by the commands
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    http: Arc<HttpClient>,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config.validate().map_err(|e| {
            eyre!("{}. Run 'moviephile config init' to create {}", e, config_file.display())
        })?;
        tracing::debug!("Loaded configuration from {}", config_file.display());
        let http = http_client(&config.http)?;
        Ok(Self { paths, config, http })
    }

    pub fn tmdb(&self) -> Result<TmdbClient> {
        Ok(build_catalog(&self.config, self.http.clone())?)
    }

    pub fn catalog(&self) -> Result<CatalogService<TmdbClient>> {
        Ok(CatalogService::new(self.tmdb()?, CatalogSettings::from_config(&self.config)))
    }

    /// Watchlist sync bound to the signed-in user, if any
    pub fn watchlist(&self, auth: &AuthSession) -> Result<Option<WatchlistSync<SupabaseClient>>> {
        let Some(store) = build_watchlist_store(&self.config, self.http.clone()) else {
            return Ok(None);
        };
        let stale_after = Duration::from_secs(self.config.watchlist.stale_after_secs);
        let mut sync = WatchlistSync::new(store, stale_after);
        sync.set_user(auth.current_user());
        Ok(Some(sync))
    }

    /// Like [`AppContext::watchlist`], but a missing store is an error
    pub fn require_watchlist(&self, auth: &AuthSession) -> Result<WatchlistSync<SupabaseClient>> {
        self.watchlist(auth)?.ok_or_else(|| {
            eyre!("No watchlist backend configured. Set [supabase] in the config file or MOVIEPHILE_SUPABASE_URL / MOVIEPHILE_SUPABASE_ANON_KEY")
        })
    }
}

/// Session restored from the session file
pub fn restore_session(paths: &PathManager) -> Result<AuthSession> {
    let mut auth = AuthSession::with_store(SessionStore::new(paths.session_file()));
    auth.restore()?;
    Ok(auth)
}
