//! Block User Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use karat_app::domain::users::models::UserUuid;

use crate::{
    admin::models::BlockUserRequest,
    envelope::{Envelope, ok},
    extensions::*,
    state::State,
    users::{into_status_error, models::UserResponse},
};

/// Block User Handler
///
/// Blocked customers can no longer log in, and their existing tokens stop working.
#[endpoint(
    tags("admin"),
    summary = "Block or Unblock User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "User updated"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
    ),
)]
#[tracing::instrument(
    name = "admin.users.block",
    skip(user, json, depot),
    fields(user_uuid = tracing::field::Empty, blocked = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<BlockUserRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<UserResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = user.into_inner();
    let blocked = json.into_inner().blocked;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("blocked", blocked);

    let updated = state
        .app
        .users
        .set_blocked(UserUuid::from_uuid(user), blocked)
        .await
        .map_err(into_status_error)?;

    tracing::info!(user_uuid = %user, blocked, "updated user block flag");

    Ok(ok(updated.into()))
}
