//! Authentication

mod errors;
pub mod otp;
mod service;
pub mod tokens;

pub use errors::*;
pub use otp::{InMemoryOtpStore, OtpStore};
pub use service::*;
pub use tokens::{IssuedToken, Principal, TokenError, TokenIssuer};
