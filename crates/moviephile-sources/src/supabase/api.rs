use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use crate::error::SourceError;

const SERVICE: &str = "supabase";

/// PostgREST `eq` filter value
pub fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

/// URL of a table endpoint with query filters
pub fn table_url(base_url: &str, table: &str, params: &[(&str, String)]) -> Result<Url, SourceError> {
    let raw = format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table);
    let query: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let parsed = if query.is_empty() {
        Url::parse(&raw)
    } else {
        Url::parse_with_params(&raw, &query)
    };
    parsed.map_err(|e| SourceError::new(format!("Invalid Supabase URL {}: {}", raw, e)))
}

/// Filters selecting one user's row for one content id
pub fn row_filters(user_id: &str, movie_id: u64) -> Vec<(&'static str, String)> {
    vec![("user_id", eq(user_id)), ("movie_id", eq(movie_id))]
}

/// Attach the anon key the way supabase-js does
pub fn request(client: &Client, method: Method, url: Url, anon_key: &str) -> RequestBuilder {
    client
        .request(method, url)
        .header("apikey", anon_key)
        .header("Authorization", format!("Bearer {}", anon_key))
        .header("Accept", "application/json")
}

/// Fail on non-success status, otherwise hand back the response
pub async fn check(response: Response, action: &str) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        trace!(action, status = status.as_u16(), "Supabase request ok");
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(action, status = status.as_u16(), "Supabase request failed");
    Err(SourceError::Status {
        service: SERVICE,
        status: status.as_u16(),
        body,
    })
}

pub async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SourceError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
