use thiserror::Error;
use url::Url;

pub const COUNTRY_ROUTE: &str = "/api/country/:code";
pub const HEALTH_ROUTE: &str = "/healthz";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "http://api.worldbank.org/v2";

#[derive(Debug, Error)]
#[error("invalid base url '{base_url}': {reason}")]
pub struct UrlError {
    pub base_url: String,
    pub reason: String,
}

/// `{server_url}/api/country/{code}` with `code` percent-encoded as a single segment.
pub fn country_url(server_url: &str, iso_code: &str) -> Result<Url, UrlError> {
    join_segments(server_url, &["api", "country", iso_code])
}

/// `{upstream_base_url}/country/{code}?format=json`.
pub fn upstream_country_url(upstream_base_url: &str, iso_code: &str) -> Result<Url, UrlError> {
    let mut url = join_segments(upstream_base_url, &["country", iso_code])?;
    url.query_pairs_mut().append_pair("format", "json");
    Ok(url)
}

fn join_segments(base_url: &str, segments: &[&str]) -> Result<Url, UrlError> {
    let mut url = Url::parse(base_url).map_err(|e| UrlError {
        base_url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    {
        let mut path = url.path_segments_mut().map_err(|_| UrlError {
            base_url: base_url.to_string(),
            reason: "url cannot be a base".to_string(),
        })?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Ok(url)
}
