//! Payments service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::payments::{gateway::GatewayError, models::VerificationFailure};

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("payment not found")]
    NotFound,

    #[error("order not found")]
    OrderNotFound,

    #[error("payment gateway is not configured")]
    NotConfigured,

    #[error("missing payment verification fields")]
    MissingFields,

    #[error("payment not created for order")]
    NoPayment,

    #[error("payment provider mismatch")]
    ProviderMismatch,

    #[error(transparent)]
    VerificationFailed(VerificationFailure),

    #[error("order total cannot be charged")]
    InvalidAmount,

    #[error("payment gateway error")]
    Gateway(#[from] GatewayError),

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PaymentsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            Some(ErrorKind::ForeignKeyViolation) => Self::OrderNotFound,
            Some(ErrorKind::UniqueViolation | ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
