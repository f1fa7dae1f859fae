//! Auth service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::auth::{otp::OtpFailure, tokens::TokenError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("Invalid email")]
    InvalidEmail,

    #[error("Full name is required")]
    MissingFullName,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    AlreadyRegistered,

    #[error("Account blocked")]
    Blocked,

    #[error("User not found")]
    UserNotFound,

    #[error("OTP not requested")]
    OtpNotRequested,

    #[error("OTP expired")]
    OtpExpired,

    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("Too many attempts")]
    TooManyAttempts,

    #[error("admin login is not configured")]
    NotConfigured,

    #[error("Unauthorized")]
    InvalidToken,

    #[error("token error")]
    Token(#[from] TokenError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyRegistered,
            Some(_) | None => Self::Sql(error),
        }
    }
}

impl From<OtpFailure> for AuthServiceError {
    fn from(failure: OtpFailure) -> Self {
        match failure {
            OtpFailure::NotRequested => Self::OtpNotRequested,
            OtpFailure::TooManyAttempts => Self::TooManyAttempts,
            OtpFailure::Expired => Self::OtpExpired,
            OtpFailure::Mismatch => Self::InvalidOtp,
        }
    }
}
