use async_trait::async_trait;
use moviephile_config::TmdbConfig;
use moviephile_models::{
    ContentDetail, ContentItem, ListCategory, MediaType, Page, Results, Season, TrailerRef,
};
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;
use crate::error::SourceError;
use crate::tmdb::api;
use crate::traits::CatalogSource;

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    language: Option<String>,
}

impl TmdbClient {
    /// Catalog client on a shared HTTP client
    pub fn new(client: Arc<Client>, config: &TmdbConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        }
    }

    fn url(&self, endpoint: &str, params: &[(&str, String)]) -> Result<reqwest::Url, SourceError> {
        api::build_url(
            &self.base_url,
            endpoint,
            &self.api_key,
            self.language.as_deref(),
            params,
        )
    }

    async fn get_page(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        media_type: Option<MediaType>,
    ) -> Result<Page<ContentItem>, SourceError> {
        let url = self.url(endpoint, params)?;
        let mut page: Page<ContentItem> = api::get_json(&self.client, url).await?;
        // Single-type endpoints don't tag their results
        if let Some(media_type) = media_type {
            for item in &mut page.results {
                item.media_type = media_type;
            }
        }
        debug!(
            endpoint,
            page = page.page,
            total_pages = page.total_pages,
            results = page.results.len(),
            "Fetched TMDB page"
        );
        Ok(page)
    }
}

#[async_trait]
impl CatalogSource for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn list(
        &self,
        category: ListCategory,
        media_type: MediaType,
        page: u32,
    ) -> Result<Page<ContentItem>, SourceError> {
        let endpoint = api::list_endpoint(category, media_type)
            .ok_or(SourceError::UnsupportedList { category, media_type })?;
        self.get_page(&endpoint, &[("page", page.to_string())], Some(media_type))
            .await
    }

    async fn discover_by_genre(
        &self,
        media_type: MediaType,
        genre_id: u32,
        page: u32,
    ) -> Result<Page<ContentItem>, SourceError> {
        let params = [
            ("with_genres", genre_id.to_string()),
            ("sort_by", "popularity.desc".to_string()),
            ("page", page.to_string()),
        ];
        self.get_page(&api::discover_endpoint(media_type), &params, Some(media_type))
            .await
    }

    async fn search(&self, query: &str, page: u32) -> Result<Page<ContentItem>, SourceError> {
        let params = [("query", query.to_string()), ("page", page.to_string())];
        self.get_page("/search/movie", &params, Some(MediaType::Movie))
            .await
    }

    async fn detail(&self, media_type: MediaType, id: u64) -> Result<ContentDetail, SourceError> {
        let url = self.url(
            &api::detail_endpoint(media_type, id),
            &[("append_to_response", "videos,similar,reviews".to_string())],
        )?;
        let mut detail: ContentDetail = api::get_json(&self.client, url).await?;
        detail.item.media_type = media_type;
        for similar in &mut detail.similar.results {
            similar.media_type = media_type;
        }
        Ok(detail)
    }

    async fn videos(&self, media_type: MediaType, id: u64) -> Result<Vec<TrailerRef>, SourceError> {
        let url = self.url(&api::videos_endpoint(media_type, id), &[])?;
        let videos: Results<TrailerRef> = api::get_json(&self.client, url).await?;
        Ok(videos.results)
    }

    async fn season(&self, show_id: u64, season_number: u32) -> Result<Season, SourceError> {
        let url = self.url(&api::season_endpoint(show_id, season_number), &[])?;
        api::get_json(&self.client, url).await
    }
}
