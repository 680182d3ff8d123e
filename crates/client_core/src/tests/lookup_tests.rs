use super::*;
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use tokio::sync::{oneshot, Mutex};

type Outcome = Result<CountryRecord, TransportError>;

struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Outcome>>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn new(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CountryTransport for ScriptedTransport {
    async fn get_country(&self, iso_code: &str) -> Outcome {
        self.requested.lock().await.push(iso_code.to_string());
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted outcome".into())))
    }
}

/// Holds the request open until the test releases it.
struct GatedTransport {
    gate: Mutex<Option<oneshot::Receiver<Outcome>>>,
}

impl GatedTransport {
    fn new() -> (Self, oneshot::Sender<Outcome>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                gate: Mutex::new(Some(rx)),
            },
            tx,
        )
    }
}

#[async_trait]
impl CountryTransport for GatedTransport {
    async fn get_country(&self, _iso_code: &str) -> Outcome {
        let rx = self.gate.lock().await.take().expect("single use gate");
        rx.await.expect("gate released")
    }
}

fn server_error(status: u16, message: &str) -> TransportError {
    TransportError::Status {
        status,
        body: Some(json!({ "error": message })),
    }
}

#[test]
fn starts_empty() {
    let client = LookupClient::new(ScriptedTransport::new([]));
    assert_eq!(client.state(), LookupState::default());
    assert!(!client.state().is_loading);
}

#[tokio::test]
async fn loading_is_visible_on_first_poll_and_cleared_after_success() {
    let (transport, release) = GatedTransport::new();
    let client = LookupClient::new(transport);

    let fetch = client.fetch_country("TL");
    futures::pin_mut!(fetch);
    assert!(futures::poll!(fetch.as_mut()).is_pending());
    assert!(client.state().is_loading);
    assert_eq!(client.state().data, None);

    release
        .send(Ok(json!({ "name": "Testland" })))
        .expect("release");
    fetch.await;
    assert!(!client.state().is_loading);
}

#[tokio::test]
async fn loading_is_cleared_after_failure() {
    let (transport, release) = GatedTransport::new();
    let client = LookupClient::new(transport);

    let fetch = client.fetch_country("XX");
    futures::pin_mut!(fetch);
    assert!(futures::poll!(fetch.as_mut()).is_pending());
    assert!(client.state().is_loading);

    release
        .send(Err(TransportError::Network("boom".into())))
        .expect("release");
    fetch.await;
    let state = client.state();
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some("boom"));
}

#[tokio::test]
async fn success_stores_body_and_leaves_error_empty() {
    let country = json!({ "id": "US", "name": "United States" });
    let client = LookupClient::new(ScriptedTransport::new([Ok(country.clone())]));

    client.fetch_country("US").await;
    let state = client.state();
    assert_eq!(state.data, Some(country));
    assert_eq!(state.error, None);
    assert!(!state.is_loading);
    assert_eq!(*client.transport().requested.lock().await, vec!["US"]);
}

#[tokio::test]
async fn server_error_field_takes_priority() {
    let client = LookupClient::new(ScriptedTransport::new([Err(server_error(
        404,
        "Country not found on our server",
    ))]));

    client.fetch_country("XX").await;
    let state = client.state();
    assert_eq!(state.data, None);
    assert_eq!(
        state.error.as_deref(),
        Some("Country not found on our server")
    );
}

#[tokio::test]
async fn transport_message_is_used_without_server_error() {
    let client = LookupClient::new(ScriptedTransport::new([Err(TransportError::Network(
        "Network Error Occurred".into(),
    ))]));

    client.fetch_country("YY").await;
    assert_eq!(
        client.state().error.as_deref(),
        Some("Network Error Occurred")
    );
}

#[test]
fn message_priority_falls_through_to_fixed_fallback() {
    assert_eq!(error_message(&server_error(500, "X")), "X");
    assert_eq!(
        error_message(&TransportError::Status {
            status: 502,
            body: Some(json!({ "detail": "not ours" })),
        }),
        "Request failed with status code 502"
    );
    assert_eq!(
        error_message(&TransportError::Network(String::new())),
        "An error occurred while fetching data."
    );
}

#[tokio::test]
async fn second_fetch_replaces_data_and_clears_error() {
    let client = LookupClient::new(ScriptedTransport::new([
        Ok(json!({ "name": "Oldland" })),
        Err(server_error(404, "gone")),
        Ok(json!({ "name": "Newland" })),
    ]));

    client.fetch_country("OL").await;
    assert_eq!(client.state().data.expect("data")["name"], "Oldland");

    client.fetch_country("GN").await;
    assert_eq!(client.state().data, None);
    assert_eq!(client.state().error.as_deref(), Some("gone"));

    client.fetch_country("NL").await;
    let state = client.state();
    assert_eq!(state.data.expect("data")["name"], "Newland");
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn subscribers_see_loading_then_settled_state() {
    let (transport, release) = GatedTransport::new();
    let client = LookupClient::new(transport);
    let mut updates = client.subscribe();

    let fetch = client.fetch_country("TL");
    futures::pin_mut!(fetch);
    assert!(futures::poll!(fetch.as_mut()).is_pending());

    assert!(updates.has_changed().expect("sender alive"));
    assert!(updates.borrow_and_update().is_loading);

    release
        .send(Ok(json!({ "name": "Testland" })))
        .expect("release");
    fetch.await;

    assert!(updates.has_changed().expect("sender alive"));
    let settled = updates.borrow_and_update().clone();
    assert!(!settled.is_loading);
    assert_eq!(settled.data, Some(json!({ "name": "Testland" })));
}
