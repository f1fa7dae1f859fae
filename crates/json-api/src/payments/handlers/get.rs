//! Get Payment Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use karat_app::domain::payments::models::PaymentUuid;

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    payments::{into_status_error, models::PaymentResponse},
    state::State,
};

/// Get Payment Handler
#[endpoint(
    tags("payments"),
    summary = "Get Payment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Payment found"),
        (status_code = StatusCode::NOT_FOUND, description = "Payment not found"),
    ),
)]
pub(crate) async fn handler(
    payment: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<PaymentResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_403()?;

    let payment = state
        .app
        .payments
        .get_payment(user, PaymentUuid::from_uuid(payment.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(ok(payment.into()))
}
