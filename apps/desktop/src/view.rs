use std::fmt::Write as _;

use client_core::{FormErrors, LookupState, GENERAL_ERROR_KEY, ISO_CODE_FIELD};
use shared::domain::CountrySummary;

pub const MAP_ZOOM: u8 = 5;

/// Exactly one of these is on screen at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Initial,
    Loading,
    ValidationFailure(String),
    Error(String),
    Country(CountrySummary),
}

impl ViewState {
    pub fn from_snapshot(form_errors: &FormErrors, lookup: &LookupState) -> Self {
        if lookup.is_loading {
            return Self::Loading;
        }
        let validation = form_errors
            .get(ISO_CODE_FIELD)
            .or_else(|| form_errors.get(GENERAL_ERROR_KEY))
            .or_else(|| form_errors.values().next());
        if let Some(message) = validation {
            return Self::ValidationFailure(message.clone());
        }
        if let Some(message) = &lookup.error {
            return Self::Error(message.clone());
        }
        if let Some(record) = &lookup.data {
            return Self::Country(CountrySummary::from_record(record));
        }
        Self::Initial
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            Self::Loading => "Searching...",
            _ => "Search",
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Initial => "Enter a 2 or 3 letter ISO code to look up a country.".to_string(),
            Self::Loading => "Searching...".to_string(),
            Self::ValidationFailure(message) => format!("Invalid ISO code\n  {message}"),
            Self::Error(message) => format!("Error: {message}"),
            Self::Country(summary) => render_country(summary),
        }
    }
}

fn render_country(summary: &CountrySummary) -> String {
    let mut out = format!("{} ({})\n", summary.name, summary.iso2_code);
    let _ = writeln!(out, "  Capital:      {}", or_dash(&summary.capital_city));
    let _ = writeln!(out, "  Region:       {}", or_dash(&summary.region));
    let _ = writeln!(out, "  Income level: {}", or_dash(&summary.income_level));
    match MapPreview::for_country(summary) {
        Some(map) => {
            let _ = writeln!(out, "  Coordinates:  {}, {}", map.latitude, map.longitude);
            let _ = write!(out, "  Map:          {} (marker: {})", map.url(), map.popup);
        }
        None => {
            let _ = write!(out, "  Map:          no map preview available");
        }
    }
    out
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// A marker at the country's coordinates on an OpenStreetMap view.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPreview {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
    pub popup: String,
}

impl MapPreview {
    pub fn for_country(summary: &CountrySummary) -> Option<Self> {
        let (latitude, longitude) = summary.coordinates()?;
        Some(Self {
            latitude,
            longitude,
            zoom: MAP_ZOOM,
            popup: summary.name.clone(),
        })
    }

    pub fn url(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map={zoom}/{lat}/{lon}",
            lat = self.latitude,
            lon = self.longitude,
            zoom = self.zoom
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn testland() -> serde_json::Value {
        json!({
            "name": "Testland",
            "iso2Code": "TL",
            "capitalCity": "Testville",
            "region": { "value": "Test Region" },
            "incomeLevel": { "value": "High" },
            "latitude": "10.00",
            "longitude": "-20.00"
        })
    }

    fn errors(field: &str, message: &str) -> FormErrors {
        FormErrors::from([(field.to_string(), message.to_string())])
    }

    #[test]
    fn empty_snapshot_shows_initial_message() {
        let view = ViewState::from_snapshot(&FormErrors::new(), &LookupState::default());
        assert_eq!(view, ViewState::Initial);
        assert_eq!(view.submit_label(), "Search");
    }

    #[test]
    fn loading_wins_and_changes_submit_label() {
        let lookup = LookupState {
            data: Some(testland()),
            error: None,
            is_loading: true,
        };
        let view = ViewState::from_snapshot(&errors("isoCode", "bad"), &lookup);
        assert_eq!(view, ViewState::Loading);
        assert_eq!(view.submit_label(), "Searching...");
    }

    #[test]
    fn validation_failure_hides_stale_result() {
        let lookup = LookupState {
            data: Some(testland()),
            ..LookupState::default()
        };
        let view = ViewState::from_snapshot(&errors("isoCode", "Test validation error"), &lookup);
        assert_eq!(
            view,
            ViewState::ValidationFailure("Test validation error".into())
        );
        assert!(view.render().contains("Test validation error"));
    }

    #[test]
    fn general_validation_error_is_shown() {
        let view = ViewState::from_snapshot(
            &errors(GENERAL_ERROR_KEY, "An unexpected error occurred."),
            &LookupState::default(),
        );
        assert_eq!(
            view,
            ViewState::ValidationFailure("An unexpected error occurred.".into())
        );
    }

    #[test]
    fn api_error_is_rendered() {
        let lookup = LookupState {
            error: Some("Network Failure".into()),
            ..LookupState::default()
        };
        let view = ViewState::from_snapshot(&FormErrors::new(), &lookup);
        assert_eq!(view.render(), "Error: Network Failure");
    }

    #[test]
    fn country_renders_heading_details_and_map() {
        let lookup = LookupState {
            data: Some(testland()),
            ..LookupState::default()
        };
        let rendered = ViewState::from_snapshot(&FormErrors::new(), &lookup).render();
        assert!(rendered.starts_with("Testland (TL)\n"));
        assert!(rendered.contains("Testville"));
        assert!(rendered.contains("Test Region"));
        assert!(rendered.contains(
            "https://www.openstreetmap.org/?mlat=10&mlon=-20#map=5/10/-20"
        ));
    }

    #[test]
    fn country_without_coordinates_has_no_map() {
        let summary = CountrySummary {
            name: "World".into(),
            ..CountrySummary::default()
        };
        assert_eq!(MapPreview::for_country(&summary), None);
        let rendered = ViewState::Country(summary).render();
        assert!(rendered.contains("no map preview available"));
        assert!(rendered.contains("Capital:      -"));
    }
}
