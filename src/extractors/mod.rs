//! Request extractors: the database/table validation gate.

pub mod table;
pub use table::{DatabaseCtx, TableCtx};
