use shared::{domain::CountryRecord, error::FETCH_FALLBACK_MESSAGE};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::transport::{CountryTransport, HttpCountryTransport, TransportError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupState {
    pub data: Option<CountryRecord>,
    pub error: Option<String>,
    pub is_loading: bool,
}

/// Owns one lookup session's state. Every transition is published to subscribers.
pub struct LookupClient<T> {
    transport: T,
    state: watch::Sender<LookupState>,
}

impl LookupClient<HttpCountryTransport> {
    pub fn http(server_url: impl Into<String>) -> Self {
        Self::new(HttpCountryTransport::new(server_url))
    }
}

impl<T: CountryTransport> LookupClient<T> {
    pub fn new(transport: T) -> Self {
        let (state, _) = watch::channel(LookupState::default());
        Self { transport, state }
    }

    pub fn state(&self) -> LookupState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LookupState> {
        self.state.subscribe()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Never fails: the outcome lands in [`LookupState`]. Overlapping calls are not
    /// coordinated, the last one to settle owns `data`/`error`.
    pub async fn fetch_country(&self, iso_code: &str) {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.data = None;
            state.error = None;
        });

        let outcome = self.transport.get_country(iso_code).await;

        self.state.send_modify(|state| {
            match outcome {
                Ok(record) => {
                    info!(%iso_code, "country lookup succeeded");
                    state.data = Some(record);
                    state.error = None;
                }
                Err(err) => {
                    warn!(%iso_code, error = %err, "country lookup failed");
                    state.data = None;
                    state.error = Some(error_message(&err));
                }
            }
            state.is_loading = false;
        });
    }
}

/// Server-supplied message, then the transport's own, then a fixed fallback.
pub fn error_message(err: &TransportError) -> String {
    err.server_message()
        .or_else(|| Some(err.to_string()).filter(|message| !message.is_empty()))
        .unwrap_or_else(|| FETCH_FALLBACK_MESSAGE.to_string())
}

#[cfg(test)]
#[path = "tests/lookup_tests.rs"]
mod tests;
