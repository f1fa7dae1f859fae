//! Current User Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    state::State,
    users::{into_status_error, models::UserResponse},
};

/// Current User Handler
#[endpoint(
    tags("users"),
    summary = "Current User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "The calling customer"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Envelope<UserResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_403()?;

    let user = state
        .app
        .users
        .get_user(user)
        .await
        .map_err(into_status_error)?;

    Ok(ok(user.into()))
}
