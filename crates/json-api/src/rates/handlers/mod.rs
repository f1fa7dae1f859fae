//! Rate Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod diamond_types_create;
pub(crate) mod diamond_types_index;
pub(crate) mod index;
pub(crate) mod material_types;
