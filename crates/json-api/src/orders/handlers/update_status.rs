//! Update Order Status Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use karat::orders::OrderStatus;
use karat_app::domain::orders::models::OrderUuid;

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    orders::{
        into_status_error,
        models::{OrderResponse, UpdateStatusRequest},
    },
    state::State,
};

/// Update Order Status Handler
///
/// Requesting the current status returns the order unchanged.
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
#[tracing::instrument(
    name = "orders.update_status",
    skip(order, json, depot),
    fields(order_uuid = tracing::field::Empty, status = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let order = OrderUuid::from_uuid(order.into_inner());
    let status = OrderStatus::try_from(json.into_inner())?;

    tracing::Span::current()
        .record("order_uuid", tracing::field::display(order))
        .record("status", status.as_str());

    let updated = state
        .app
        .orders
        .update_status(order, status)
        .await
        .map_err(into_status_error)?;

    Ok(ok(updated.into()))
}
