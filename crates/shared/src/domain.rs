use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single World Bank country entry, passed through untouched.
pub type CountryRecord = Value;

/// Display projection of a [`CountryRecord`]. Missing or mistyped fields become empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CountrySummary {
    pub name: String,
    pub iso2_code: String,
    pub iso3_code: String,
    pub capital_city: String,
    pub region: String,
    pub income_level: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CountrySummary {
    pub fn from_record(record: &CountryRecord) -> Self {
        Self {
            name: text(record, "name"),
            iso2_code: text(record, "iso2Code"),
            iso3_code: text(record, "id"),
            capital_city: text(record, "capitalCity"),
            region: labelled(record, "region"),
            income_level: labelled(record, "incomeLevel"),
            latitude: coordinate(record, "latitude"),
            longitude: coordinate(record, "longitude"),
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

fn text(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// World Bank nests labels as `{ "id": "...", "value": "..." }`.
fn labelled(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(|v| v.get("value"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// Coordinates arrive as strings ("38.8895"), sometimes empty for aggregates.
fn coordinate(record: &Value, key: &str) -> Option<f64> {
    let parsed = match record.get(key)? {
        Value::String(raw) => raw.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}
