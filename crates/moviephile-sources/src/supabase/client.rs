use async_trait::async_trait;
use moviephile_config::SupabaseConfig;
use moviephile_models::{NewWatchlistEntry, WatchStatus, WatchlistEntry};
use reqwest::{Client, Method};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};
use crate::error::SourceError;
use crate::supabase::api;
use crate::traits::WatchlistStore;

/// Watchlist table access over PostgREST
#[derive(Clone)]
pub struct SupabaseClient {
    client: Arc<Client>,
    url: String,
    anon_key: String,
    table: String,
}

impl SupabaseClient {
    pub fn new(client: Arc<Client>, config: &SupabaseConfig) -> Self {
        Self {
            client,
            url: config.url.clone(),
            anon_key: config.anon_key.clone(),
            table: config.table.clone(),
        }
    }

    async fn patch(
        &self,
        user_id: &str,
        movie_id: u64,
        body: serde_json::Value,
        action: &str,
    ) -> Result<(), SourceError> {
        let url = api::table_url(&self.url, &self.table, &api::row_filters(user_id, movie_id))?;
        let response = api::request(&self.client, Method::PATCH, url, &self.anon_key)
            .json(&body)
            .send()
            .await?;
        api::check(response, action).await?;
        Ok(())
    }
}

#[async_trait]
impl WatchlistStore for SupabaseClient {
    fn store_name(&self) -> &str {
        "supabase"
    }

    async fn fetch(&self, user_id: &str) -> Result<Vec<WatchlistEntry>, SourceError> {
        let params = [
            ("select", "*".to_string()),
            ("user_id", api::eq(user_id)),
            ("order", "created_at.desc".to_string()),
        ];
        let url = api::table_url(&self.url, &self.table, &params)?;
        let response = api::request(&self.client, Method::GET, url, &self.anon_key)
            .send()
            .await?;
        let rows: Vec<WatchlistEntry> = api::decode(api::check(response, "fetch").await?).await?;
        debug!(user_id, rows = rows.len(), "Fetched watchlist");
        Ok(rows)
    }

    async fn get(&self, user_id: &str, movie_id: u64) -> Result<Option<WatchlistEntry>, SourceError> {
        let mut params = api::row_filters(user_id, movie_id);
        params.push(("select", "*".to_string()));
        params.push(("limit", "1".to_string()));
        let url = api::table_url(&self.url, &self.table, &params)?;
        let response = api::request(&self.client, Method::GET, url, &self.anon_key)
            .send()
            .await?;
        let rows: Vec<WatchlistEntry> = api::decode(api::check(response, "get").await?).await?;
        Ok(rows.into_iter().next())
    }

    async fn contains(&self, user_id: &str, movie_id: u64) -> Result<bool, SourceError> {
        let mut params = api::row_filters(user_id, movie_id);
        params.push(("select", "id".to_string()));
        params.push(("limit", "1".to_string()));
        let url = api::table_url(&self.url, &self.table, &params)?;
        let response = api::request(&self.client, Method::GET, url, &self.anon_key)
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = api::decode(api::check(response, "contains").await?).await?;
        Ok(!rows.is_empty())
    }

    async fn insert(&self, entry: &NewWatchlistEntry) -> Result<WatchlistEntry, SourceError> {
        let url = api::table_url(&self.url, &self.table, &[])?;
        let response = api::request(&self.client, Method::POST, url, &self.anon_key)
            .header("Prefer", "return=representation")
            .json(entry)
            .send()
            .await?;
        let rows: Vec<WatchlistEntry> = api::decode(api::check(response, "insert").await?).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::new("Insert returned no rows"))?;
        info!(user_id = %entry.user_id, movie_id = entry.movie_id, "Added to watchlist");
        Ok(row)
    }

    async fn delete(&self, user_id: &str, movie_id: u64) -> Result<(), SourceError> {
        let url = api::table_url(&self.url, &self.table, &api::row_filters(user_id, movie_id))?;
        let response = api::request(&self.client, Method::DELETE, url, &self.anon_key)
            .send()
            .await?;
        api::check(response, "delete").await?;
        info!(user_id, movie_id, "Removed from watchlist");
        Ok(())
    }

    async fn update_status(
        &self,
        user_id: &str,
        movie_id: u64,
        status: WatchStatus,
    ) -> Result<(), SourceError> {
        self.patch(user_id, movie_id, json!({ "status": status }), "update_status")
            .await
    }

    async fn update_progress(
        &self,
        user_id: &str,
        movie_id: u64,
        progress: u8,
    ) -> Result<(), SourceError> {
        self.patch(user_id, movie_id, json!({ "progress": progress }), "update_progress")
            .await
    }
}
