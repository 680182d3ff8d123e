use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body returned by the proxy for every non-200 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Reads `error` out of an arbitrary JSON body when it is a non-empty string.
    pub fn extract(body: &Value) -> Option<String> {
        body.get("error")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_owned)
    }
}

pub fn not_found_message(iso_code: &str) -> String {
    format!("No data found for ISO code \"{iso_code}\".")
}

pub const UPSTREAM_FAILURE_MESSAGE: &str = "Server failed to fetch data.";
pub const FETCH_FALLBACK_MESSAGE: &str = "An error occurred while fetching data.";
pub const UNEXPECTED_VALIDATION_MESSAGE: &str = "An unexpected error occurred.";
