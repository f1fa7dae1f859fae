//! Product Index Handler

use std::sync::Arc;

use karat_app::pagination::PageRequest;
use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    envelope::{Listing, listing},
    extensions::*,
    products::{into_status_error, models::ProductResponse},
    state::State,
};

/// Product Index Handler
///
/// Lists active products, each priced against the current rates.
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<Listing<ProductResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = state
        .app
        .products
        .list_products(PageRequest::new(page.into_inner(), limit.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(listing(products))
}
