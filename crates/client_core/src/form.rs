use std::collections::BTreeMap;

use shared::error::UNEXPECTED_VALIDATION_MESSAGE;
use tracing::error;

use crate::schema::{Schema, SchemaError};

pub type FormValues = BTreeMap<String, String>;
/// At most one message per field.
pub type FormErrors = BTreeMap<String, String>;

pub const GENERAL_ERROR_KEY: &str = "_general";

pub struct FormState<S> {
    values: FormValues,
    errors: FormErrors,
    schema: S,
}

impl<S: Schema> FormState<S> {
    pub fn new<K, V>(initial: impl IntoIterator<Item = (K, V)>, schema: S) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: initial
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            errors: FormErrors::new(),
            schema,
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    /// Stores `value` and drops every error, not only the one for `name`.
    pub fn update_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
        self.errors = FormErrors::new();
    }

    pub async fn validate_form(&mut self) -> bool {
        self.errors = FormErrors::new();
        match self.schema.validate(&self.values).await {
            Ok(()) => true,
            Err(SchemaError::Validation { path, message }) => {
                self.errors = FormErrors::from([(path, message)]);
                false
            }
            Err(err @ SchemaError::Unexpected(_)) => {
                error!(error = %err, "form validation failed unexpectedly");
                self.errors = FormErrors::from([(
                    GENERAL_ERROR_KEY.to_string(),
                    UNEXPECTED_VALIDATION_MESSAGE.to_string(),
                )]);
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
