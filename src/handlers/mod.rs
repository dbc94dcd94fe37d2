//! HTTP handlers for registry metadata, record CRUD, and CSV upload.

pub mod meta;
pub mod records;
pub mod upload;
pub use meta::*;
pub use records::*;
pub use upload::*;
