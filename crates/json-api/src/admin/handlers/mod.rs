//! Admin Handlers

pub(crate) mod block_user;
pub(crate) mod login_init;
pub(crate) mod login_verify;
pub(crate) mod me;
pub(crate) mod users_index;
