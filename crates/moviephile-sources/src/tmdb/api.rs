use moviephile_models::{ListCategory, MediaType};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use crate::error::SourceError;

const SERVICE: &str = "tmdb";

/// Endpoint for a curated list, or None when the list doesn't exist for that media type
pub fn list_endpoint(category: ListCategory, media_type: MediaType) -> Option<String> {
    let media = media_type.path_segment();
    let endpoint = match (category, media_type) {
        (ListCategory::Trending, _) => format!("/trending/{}/week", media),
        (ListCategory::Popular, _) => format!("/{}/popular", media),
        (ListCategory::TopRated, _) => format!("/{}/top_rated", media),
        (ListCategory::NowPlaying, MediaType::Movie) => "/movie/now_playing".to_string(),
        (ListCategory::Upcoming, MediaType::Movie) => "/movie/upcoming".to_string(),
        (ListCategory::OnTheAir, MediaType::Tv) => "/tv/on_the_air".to_string(),
        (ListCategory::AiringToday, MediaType::Tv) => "/tv/airing_today".to_string(),
        _ => return None,
    };
    Some(endpoint)
}

pub fn detail_endpoint(media_type: MediaType, id: u64) -> String {
    format!("/{}/{}", media_type.path_segment(), id)
}

pub fn videos_endpoint(media_type: MediaType, id: u64) -> String {
    format!("/{}/{}/videos", media_type.path_segment(), id)
}

pub fn season_endpoint(show_id: u64, season_number: u32) -> String {
    format!("/tv/{}/season/{}", show_id, season_number)
}

pub fn discover_endpoint(media_type: MediaType) -> String {
    format!("/discover/{}", media_type.path_segment())
}

/// Build a request URL carrying the API key, optional language and extra params
pub fn build_url(
    base_url: &str,
    endpoint: &str,
    api_key: &str,
    language: Option<&str>,
    params: &[(&str, String)],
) -> Result<Url, SourceError> {
    let mut query: Vec<(&str, &str)> = vec![("api_key", api_key)];
    if let Some(language) = language {
        query.push(("language", language));
    }
    query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

    let raw = format!("{}{}", base_url.trim_end_matches('/'), endpoint);
    Url::parse_with_params(&raw, &query)
        .map_err(|e| SourceError::new(format!("Invalid TMDB URL {}: {}", raw, e)))
}

/// GET a URL and decode the JSON body
pub async fn get_json<T: DeserializeOwned>(client: &Client, url: Url) -> Result<T, SourceError> {
    trace!(path = url.path(), "TMDB request");
    let response = client
        .get(url.clone())
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!(path = url.path(), status = status.as_u16(), "TMDB request failed");
        return Err(SourceError::Status {
            service: SERVICE,
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
