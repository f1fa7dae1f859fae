//! Rate Errors

use karat_app::domain::rates::RatesServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: RatesServiceError) -> StatusError {
    match error {
        RatesServiceError::NotFound => StatusError::not_found().brief("Rate not found"),
        RatesServiceError::AlreadyExists => StatusError::conflict().brief("Already exists"),
        RatesServiceError::InvalidReference => {
            StatusError::bad_request().brief("Referenced diamond type does not exist")
        }
        RatesServiceError::MissingRequiredData | RatesServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid rate payload")
        }
        RatesServiceError::Sql(source) => {
            error!("rates storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
