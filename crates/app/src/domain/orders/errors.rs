//! Orders service errors.

use karat::{orders::AmountOverflow, promo::PromoRejection};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("order has no items")]
    MissingItems,

    #[error("order items are invalid")]
    InvalidItems,

    #[error("promo code not found")]
    PromoNotFound,

    #[error(transparent)]
    PromoRejected(#[from] PromoRejection),

    #[error("referenced record does not exist")]
    InvalidReference,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<AmountOverflow> for OrdersServiceError {
    fn from(_overflow: AmountOverflow) -> Self {
        Self::InvalidItems
    }
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            Some(ErrorKind::UniqueViolation | ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
