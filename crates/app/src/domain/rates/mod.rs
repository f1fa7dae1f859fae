//! Rates
//!
//! Commodity rate snapshots and the diamond types diamond rates refer to.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::RatesServiceError;
pub use service::*;
