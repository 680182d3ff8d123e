use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::form::FormValues;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{path}: {message}")]
    Validation { path: String, message: String },
    #[error("unexpected validation failure: {0}")]
    Unexpected(#[from] anyhow::Error),
}

#[async_trait]
pub trait Schema: Send + Sync {
    /// Stops at the first failing field. Must not modify `values`.
    async fn validate(&self, values: &FormValues) -> Result<(), SchemaError>;
}

#[derive(Clone)]
enum Rule {
    Required { message: String },
    Transform(fn(&str) -> String),
    Matches {
        predicate: fn(&str) -> bool,
        message: String,
    },
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { message } => {
                f.debug_struct("Required").field("message", message).finish()
            }
            Self::Transform(_) => f.write_str("Transform"),
            Self::Matches { message, .. } => {
                f.debug_struct("Matches").field("message", message).finish()
            }
        }
    }
}

/// A string field checked by an ordered list of rules. Transforms only affect the
/// working copy seen by later rules.
#[derive(Debug, Clone)]
pub struct StringField {
    name: String,
    rules: Vec<Rule>,
}

impl StringField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.rules.push(Rule::Required {
            message: message.into(),
        });
        self
    }

    pub fn transform(mut self, transform: fn(&str) -> String) -> Self {
        self.rules.push(Rule::Transform(transform));
        self
    }

    pub fn matches(mut self, predicate: fn(&str) -> bool, message: impl Into<String>) -> Self {
        self.rules.push(Rule::Matches {
            predicate,
            message: message.into(),
        });
        self
    }

    fn check(&self, raw: Option<&str>) -> Result<(), String> {
        let mut working = match raw {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => {
                return match self.rules.iter().find_map(|rule| match rule {
                    Rule::Required { message } => Some(message.clone()),
                    _ => None,
                }) {
                    Some(message) => Err(message),
                    None => Ok(()),
                };
            }
        };

        for rule in &self.rules {
            match rule {
                Rule::Required { .. } => {}
                Rule::Transform(transform) => working = transform(&working),
                Rule::Matches { predicate, message } => {
                    if !predicate(&working) {
                        return Err(message.clone());
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<StringField>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: StringField) -> Self {
        self.fields.push(field);
        self
    }
}

#[async_trait]
impl Schema for ObjectSchema {
    async fn validate(&self, values: &FormValues) -> Result<(), SchemaError> {
        for field in &self.fields {
            field
                .check(values.get(field.name()).map(String::as_str))
                .map_err(|message| SchemaError::Validation {
                    path: field.name().to_string(),
                    message,
                })?;
        }
        Ok(())
    }
}

pub fn is_iso_code_shape(value: &str) -> bool {
    (2..=3).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_uppercase())
}

/// `isoCode`: required, uppercased, then exactly two or three letters.
pub fn world_bank_schema() -> ObjectSchema {
    ObjectSchema::new().field(
        StringField::new(crate::search::ISO_CODE_FIELD)
            .required("ISO Code is required.")
            .transform(str::to_uppercase)
            .matches(is_iso_code_shape, "ISO code must be 2 or 3 letters."),
    )
}
