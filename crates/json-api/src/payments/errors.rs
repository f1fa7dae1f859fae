//! Payment Errors

use karat_app::domain::payments::PaymentsServiceError;
use salvo::http::StatusError;
use tracing::{error, warn};

use crate::envelope::rejected;

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::NotFound => StatusError::not_found().brief("Payment not found"),
        PaymentsServiceError::OrderNotFound => StatusError::not_found().brief("Order not found"),
        PaymentsServiceError::NotConfigured => {
            StatusError::service_unavailable().brief("Razorpay not configured")
        }
        PaymentsServiceError::MissingFields => {
            StatusError::bad_request().brief("Missing Razorpay fields")
        }
        PaymentsServiceError::NoPayment => {
            StatusError::bad_request().brief("Payment not created for order")
        }
        PaymentsServiceError::ProviderMismatch => {
            StatusError::bad_request().brief("Payment provider mismatch")
        }
        PaymentsServiceError::VerificationFailed(failure) => {
            rejected(failure.to_string(), failure.reason())
        }
        PaymentsServiceError::InvalidAmount => {
            StatusError::bad_request().brief("Order total cannot be charged")
        }
        PaymentsServiceError::Gateway(source) => {
            warn!("payment gateway error: {source}");

            StatusError::bad_gateway().brief("Payment gateway error")
        }
        PaymentsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid payment payload")
        }
        PaymentsServiceError::Sql(source) => {
            error!("payments storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
