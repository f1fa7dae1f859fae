//! Admin Order Index Handler

use std::sync::Arc;

use karat_app::pagination::PageRequest;
use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    envelope::{Listing, listing},
    extensions::*,
    orders::{into_status_error, models::OrderResponse},
    state::State,
};

/// Admin Order Index Handler
#[endpoint(tags("admin"), summary = "List All Orders", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<Listing<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let orders = state
        .app
        .orders
        .list_all_orders(PageRequest::new(page.into_inner(), limit.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(listing(orders))
}
