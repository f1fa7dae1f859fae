//! Update Delivery Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use karat::orders::DeliveryPatch;
use karat_app::domain::orders::models::OrderUuid;

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    orders::{
        into_status_error,
        models::{OrderResponse, UpdateDeliveryRequest},
    },
    state::State,
};

/// Update Delivery Handler
#[endpoint(
    tags("orders"),
    summary = "Update Delivery Details",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Delivery details merged"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown delivery status"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
#[tracing::instrument(
    name = "orders.update_delivery",
    skip(order, json, depot),
    fields(order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateDeliveryRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let order = OrderUuid::from_uuid(order.into_inner());
    let patch = DeliveryPatch::try_from(json.into_inner())?;

    tracing::Span::current().record("order_uuid", tracing::field::display(order));

    let updated = state
        .app
        .orders
        .set_delivery(order, patch)
        .await
        .map_err(into_status_error)?;

    Ok(ok(updated.into()))
}
