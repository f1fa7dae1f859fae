//! Admin Login Verify Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    auth::into_status_error,
    envelope::{Envelope, ok},
    extensions::*,
    state::State,
    users::models::{TokenResponse, VerifyOtpRequest},
};

/// Admin Login Verify Handler
///
/// Exchanges the emailed code for a one-day admin token.
#[endpoint(
    tags("admin"),
    summary = "Complete Admin Login",
    responses(
        (status_code = StatusCode::OK, description = "Admin token issued"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid or expired code"),
        (status_code = StatusCode::TOO_MANY_REQUESTS, description = "Too many attempts"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<VerifyOtpRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<TokenResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let token = state
        .app
        .auth
        .admin_login_verify(&request.email, &request.otp)
        .await
        .map_err(into_status_error)?;

    Ok(ok(token.into()))
}
