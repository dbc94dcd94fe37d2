//! TableStore: store operations and payload validation.

mod crud;
mod validation;
pub use crud::TableStore;
pub(crate) use crud::{empty_csv_message, invalid_payload_message};
pub use validation::RecordValidator;
