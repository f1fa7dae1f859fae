//! Order Errors

use karat_app::domain::orders::OrdersServiceError;
use salvo::http::StatusError;
use tracing::error;

use crate::envelope::rejected;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::MissingItems => StatusError::bad_request().brief("No items in order"),
        OrdersServiceError::InvalidItems => {
            StatusError::bad_request().brief("Order contains invalid items")
        }
        OrdersServiceError::PromoNotFound => {
            StatusError::not_found().brief("Promo code not found")
        }
        OrdersServiceError::PromoRejected(rejection) => {
            rejected(rejection.to_string(), rejection.reason())
        }
        OrdersServiceError::InvalidReference => {
            StatusError::bad_request().brief("Referenced record does not exist")
        }
        OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Sql(source) => {
            error!("orders storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
