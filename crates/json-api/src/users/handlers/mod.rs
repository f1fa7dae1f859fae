//! User Handlers

pub(crate) mod login_init;
pub(crate) mod login_verify;
pub(crate) mod me;
pub(crate) mod signup_init;
pub(crate) mod signup_verify;
