//! Rates
//!
//! Commodity rate snapshots, the diamond types diamond rates are quoted against, and the
//! material-type catalog the product forms pick from.

mod errors;
mod handlers;
pub(crate) mod models;

pub(crate) use errors::into_status_error;
pub(crate) use handlers::*;
