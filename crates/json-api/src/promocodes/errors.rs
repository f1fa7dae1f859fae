//! Promo Code Errors

use karat_app::domain::promocodes::PromoCodesServiceError;
use salvo::http::StatusError;
use tracing::error;

use crate::envelope::rejected;

pub(crate) fn into_status_error(error: PromoCodesServiceError) -> StatusError {
    match error {
        PromoCodesServiceError::NotFound => StatusError::not_found().brief("Promo code not found"),
        PromoCodesServiceError::AlreadyExists => {
            StatusError::conflict().brief("Promo code already exists")
        }
        PromoCodesServiceError::MissingRequiredData => {
            StatusError::bad_request().brief("Promo code is required")
        }
        PromoCodesServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid promo code payload")
        }
        PromoCodesServiceError::Rejected(rejection) => {
            rejected(rejection.to_string(), rejection.reason())
        }
        PromoCodesServiceError::Sql(source) => {
            error!("promo codes storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
