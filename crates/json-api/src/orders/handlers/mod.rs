//! Order Handlers

pub(crate) mod admin_index;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update_delivery;
pub(crate) mod update_status;
