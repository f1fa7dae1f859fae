//! Products

mod errors;
mod handlers;
pub(crate) mod models;

pub(crate) use errors::{into_status_error, material_error};
pub(crate) use handlers::*;
