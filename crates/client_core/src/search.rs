use tracing::debug;

use crate::{
    form::FormState,
    lookup::{LookupClient, LookupState},
    schema::{world_bank_schema, ObjectSchema, Schema},
    transport::CountryTransport,
};

pub const ISO_CODE_FIELD: &str = "isoCode";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; no request was made.
    Rejected,
    Fetched,
}

/// Wires the ISO code form to a lookup client: input, submit, and the state to render.
pub struct CountrySearch<T, S = ObjectSchema> {
    form: FormState<S>,
    lookup: LookupClient<T>,
}

impl<T: CountryTransport> CountrySearch<T> {
    pub fn new(transport: T) -> Self {
        Self::with_schema(transport, world_bank_schema())
    }
}

impl<T: CountryTransport, S: Schema> CountrySearch<T, S> {
    pub fn with_schema(transport: T, schema: S) -> Self {
        Self {
            form: FormState::new([(ISO_CODE_FIELD, "")], schema),
            lookup: LookupClient::new(transport),
        }
    }

    pub fn form(&self) -> &FormState<S> {
        &self.form
    }

    pub fn lookup(&self) -> &LookupClient<T> {
        &self.lookup
    }

    pub fn lookup_state(&self) -> LookupState {
        self.lookup.state()
    }

    pub fn input(&mut self, iso_code: impl Into<String>) {
        self.form.update_field(ISO_CODE_FIELD, iso_code);
    }

    /// Validates, then fetches with the code exactly as typed.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.form.validate_form().await {
            debug!(errors = ?self.form.errors(), "search rejected by validation");
            return SubmitOutcome::Rejected;
        }

        let iso_code = self.form.value(ISO_CODE_FIELD).unwrap_or_default().to_string();
        self.lookup.fetch_country(&iso_code).await;
        SubmitOutcome::Fetched
    }
}
