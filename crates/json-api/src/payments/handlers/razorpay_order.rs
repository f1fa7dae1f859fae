//! Create Razorpay Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use karat_app::domain::orders::models::OrderUuid;

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    payments::{
        into_status_error,
        models::{CreateRazorpayOrderRequest, RazorpayCheckoutResponse},
    },
    state::State,
};

/// Create Razorpay Order Handler
///
/// Responds 201 when a gateway order is opened and 200 when the order already has one.
#[endpoint(
    tags("payments"),
    summary = "Open Razorpay Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Gateway order created"),
        (status_code = StatusCode::OK, description = "Existing gateway order"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Gateway call failed"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Razorpay not configured"),
    ),
)]
#[tracing::instrument(
    name = "payments.razorpay_order",
    skip(json, depot, res),
    fields(order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateRazorpayOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Envelope<RazorpayCheckoutResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_403()?;
    let request = json.into_inner();
    let order = OrderUuid::from_uuid(request.order_id);

    tracing::Span::current().record("order_uuid", tracing::field::display(order));

    let checkout = state
        .app
        .payments
        .create_razorpay_order(user, order, request.method)
        .await
        .map_err(into_status_error)?;

    if checkout.created {
        tracing::info!(payment_uuid = %checkout.payment, "razorpay order created");

        res.status_code(StatusCode::CREATED);
    }

    Ok(ok(checkout.into()))
}
