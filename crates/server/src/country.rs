use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use shared::{
    domain::CountryRecord,
    error::{not_found_message, ErrorBody, UPSTREAM_FAILURE_MESSAGE},
    protocol::{upstream_country_url, UrlError},
};
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Url(#[from] UrlError),
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream responded with status {status}")]
    Status { status: u16, body: Option<Value> },
}

#[derive(Clone)]
pub struct WorldBankClient {
    http: reqwest::Client,
    base_url: String,
}

impl WorldBankClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the raw upstream body. Non-2xx statuses are errors; a body that is not
    /// JSON is returned as `Value::Null` so reshaping treats it as "no data".
    pub async fn fetch_country(&self, iso_code: &str) -> Result<Value, UpstreamError> {
        let url = upstream_country_url(&self.base_url, iso_code)?;
        info!(%url, "requesting upstream country");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice::<Value>(&bytes).ok();

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(%iso_code, ?body, "upstream response received");
        Ok(body.unwrap_or(Value::Null))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CountryResponse {
    Found(CountryRecord),
    Failed(StatusCode, ErrorBody),
}

impl IntoResponse for CountryResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Found(record) => (StatusCode::OK, Json(record)).into_response(),
            Self::Failed(status, body) => (status, Json(body)).into_response(),
        }
    }
}

pub async fn lookup_country(client: &WorldBankClient, iso_code: &str) -> CountryResponse {
    match client.fetch_country(iso_code).await {
        Ok(body) => reshape_country_response(iso_code, &body),
        Err(err) => {
            error!(%iso_code, error = %err, "upstream call failed");
            upstream_failure_response(&err)
        }
    }
}

/// Upstream success bodies are `[metadata, records]`; only `records[0]` is returned.
pub fn reshape_country_response(iso_code: &str, body: &Value) -> CountryResponse {
    match first_record(body) {
        Some(record) => CountryResponse::Found(record.clone()),
        None => CountryResponse::Failed(
            StatusCode::NOT_FOUND,
            ErrorBody::new(not_found_message(iso_code)),
        ),
    }
}

pub fn upstream_failure_response(err: &UpstreamError) -> CountryResponse {
    let (status, message) = match err {
        UpstreamError::Status { status, body } => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body.as_ref().and_then(upstream_error_message),
        ),
        UpstreamError::Url(_) | UpstreamError::Transport(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, None)
        }
    };
    let message = message.unwrap_or_else(|| UPSTREAM_FAILURE_MESSAGE.to_string());
    CountryResponse::Failed(status, ErrorBody::new(message))
}

fn first_record(body: &Value) -> Option<&CountryRecord> {
    body.as_array()
        .filter(|parts| parts.len() > 1)?
        .get(1)?
        .as_array()?
        .first()
}

// World Bank error bodies look like `[{"message":[{"id":"120","key":"...","value":"..."}]}]`.
fn upstream_error_message(body: &Value) -> Option<String> {
    body.get(0)?
        .get("message")?
        .get(0)?
        .get("value")?
        .as_str()
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "tests/country_tests.rs"]
mod tests;
