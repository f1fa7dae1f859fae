//! Add To Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use karat_app::domain::{carts::models::NewCartItem, products::models::ProductUuid};

use crate::{
    carts::{
        into_status_error,
        models::{AddCartItemRequest, CartLineResponse},
    },
    envelope::{Envelope, ok},
    extensions::*,
    state::State,
};

/// Add To Cart Handler
///
/// Responds 201 when a new line is created and 200 when an existing line's quantity is
/// replaced.
#[endpoint(
    tags("cart"),
    summary = "Add To Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Line added"),
        (status_code = StatusCode::OK, description = "Quantity replaced"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Envelope<CartLineResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_403()?;
    let request = json.into_inner();

    if request.quantity == 0 {
        return Err(StatusError::bad_request().brief("Quantity must be at least 1"));
    }

    let addition = state
        .app
        .carts
        .add_item(
            user,
            NewCartItem {
                product: ProductUuid::from_uuid(request.product_id),
                quantity: request.quantity,
            },
        )
        .await
        .map_err(into_status_error)?;

    res.status_code(if addition.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    });

    Ok(ok(addition.line.into()))
}
