//! Route tables: /ds datastore routes and common health/version routes.

mod common;
mod ds;
pub use common::common_routes;
pub use ds::ds_routes;
