//! Admin User Index Handler

use std::sync::Arc;

use karat_app::pagination::PageRequest;
use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    envelope::{Listing, listing},
    extensions::*,
    state::State,
    users::{into_status_error, models::UserResponse},
};

/// Admin User Index Handler
///
/// Lists customer accounts, newest first.
#[endpoint(
    tags("admin"),
    summary = "List Users",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<Listing<UserResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let users = state
        .app
        .users
        .list_users(PageRequest::new(page.into_inner(), limit.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(listing(users))
}
