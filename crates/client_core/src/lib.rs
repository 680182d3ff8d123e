pub mod form;
pub mod lookup;
pub mod schema;
pub mod search;
pub mod transport;

pub use form::{FormErrors, FormState, FormValues, GENERAL_ERROR_KEY};
pub use lookup::{LookupClient, LookupState};
pub use schema::{world_bank_schema, ObjectSchema, Schema, SchemaError, StringField};
pub use search::{CountrySearch, SubmitOutcome, ISO_CODE_FIELD};
pub use transport::{CountryTransport, HttpCountryTransport, TransportError};
