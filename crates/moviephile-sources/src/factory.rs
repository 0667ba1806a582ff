//! Construction of the remote clients from configuration

use moviephile_config::{Config, HttpConfig};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use crate::error::SourceError;
use crate::supabase::SupabaseClient;
use crate::tmdb::TmdbClient;

/// One HTTP client for every remote service, so connections are pooled together
pub fn http_client(http: &HttpConfig) -> Result<Arc<Client>, SourceError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(http.request_timeout_secs))
        .build()?;
    Ok(Arc::new(client))
}

/// Catalog client; requires `tmdb.api_key`
pub fn build_catalog(config: &Config, client: Arc<Client>) -> Result<TmdbClient, SourceError> {
    if config.tmdb.api_key.trim().is_empty() {
        return Err(SourceError::new("TMDB API key is not configured"));
    }
    debug!(base_url = %config.tmdb.base_url, "Creating TMDB client");
    Ok(TmdbClient::new(client, &config.tmdb))
}

/// Watchlist store, or None when no backend is configured
pub fn build_watchlist_store(config: &Config, client: Arc<Client>) -> Option<SupabaseClient> {
    match &config.supabase {
        Some(supabase) => {
            info!(url = %supabase.url, table = %supabase.table, "Using Supabase watchlist store");
            Some(SupabaseClient::new(client, supabase))
        }
        None => {
            debug!("No watchlist store configured");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moviephile_config::SupabaseConfig;

    #[test]
    fn test_catalog_requires_api_key() {
        let client = http_client(&HttpConfig::default()).unwrap();
        assert!(build_catalog(&Config::default(), client.clone()).is_err());

        let mut config = Config::default();
        config.tmdb.api_key = "key".to_string();
        assert!(build_catalog(&config, client).is_ok());
    }

    #[test]
    fn test_store_is_optional() {
        let client = http_client(&HttpConfig::default()).unwrap();
        assert!(build_watchlist_store(&Config::default(), client).is_none());
    }

    #[test]
    fn test_services_share_one_client() {
        let mut config = Config::default();
        config.tmdb.api_key = "key".to_string();
        config.supabase = Some(SupabaseConfig {
            url: "https://project.supabase.co".to_string(),
            anon_key: "anon".to_string(),
            table: "watchlist".to_string(),
        });
        let client = http_client(&config.http).unwrap();

        let catalog = build_catalog(&config, client.clone()).unwrap();
        let store = build_watchlist_store(&config, client.clone()).unwrap();
        assert_eq!(Arc::strong_count(&client), 3);
        drop((catalog, store));
        assert_eq!(Arc::strong_count(&client), 1);
    }
}
