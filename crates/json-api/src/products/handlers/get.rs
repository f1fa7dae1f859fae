//! Get Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use karat_app::domain::products::models::ProductKey;

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    products::{into_status_error, models::ProductResponse},
    state::State,
};

/// Get Product Handler
///
/// Looks a product up by UUID or slug.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Priced product"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<Envelope<ProductResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .get_product(ProductKey::parse(&product.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(ok(product.into()))
}
