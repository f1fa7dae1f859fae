//! Admin Login Init Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    admin::models::AdminLoginRequest,
    auth::into_status_error,
    envelope::{Envelope, ok},
    extensions::*,
    state::State,
    users::models::OtpSentResponse,
};

/// Admin Login Init Handler
///
/// Checks the configured admin credentials and emails a login code.
#[endpoint(
    tags("admin"),
    summary = "Start Admin Login",
    responses(
        (status_code = StatusCode::OK, description = "OTP sent"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid credentials"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Admin login not configured"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AdminLoginRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OtpSentResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let dispatch = state
        .app
        .auth
        .admin_login_init(&request.email, &request.password)
        .await
        .map_err(into_status_error)?;

    Ok(ok(dispatch.into()))
}
