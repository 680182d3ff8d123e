use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{domain::CountryRecord, error::ErrorBody, protocol::country_url};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Request failed with status code {status}")]
    Status { status: u16, body: Option<Value> },
    #[error("{0}")]
    Network(String),
}

impl TransportError {
    /// The proxy's `{ "error": ... }` message, when the failure carried one.
    pub fn server_message(&self) -> Option<String> {
        match self {
            Self::Status {
                body: Some(body), ..
            } => ErrorBody::extract(body),
            _ => None,
        }
    }
}

#[async_trait]
pub trait CountryTransport: Send + Sync {
    async fn get_country(&self, iso_code: &str) -> Result<CountryRecord, TransportError>;
}

#[derive(Clone)]
pub struct HttpCountryTransport {
    http: Client,
    server_url: String,
}

impl HttpCountryTransport {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

#[async_trait]
impl CountryTransport for HttpCountryTransport {
    async fn get_country(&self, iso_code: &str) -> Result<CountryRecord, TransportError> {
        let url = country_url(&self.server_url, iso_code)
            .map_err(|e| TransportError::Network(e.to_string()))?;
        debug!(%url, "requesting country");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<Value>().await.ok();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<CountryRecord>()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
