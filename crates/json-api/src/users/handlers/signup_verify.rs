//! Signup Verify Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    auth::into_status_error,
    envelope::{Envelope, ok},
    extensions::*,
    state::State,
    users::models::{SessionResponse, VerifyOtpRequest},
};

/// Signup Verify Handler
///
/// Creates the account and returns a customer token.
#[endpoint(
    tags("users"),
    summary = "Complete Signup",
    responses(
        (status_code = StatusCode::CREATED, description = "Account created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid or expired code"),
        (status_code = StatusCode::TOO_MANY_REQUESTS, description = "Too many attempts"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<VerifyOtpRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Envelope<SessionResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let session = state
        .app
        .auth
        .signup_verify(&request.email, &request.otp)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(ok(session.into()))
}
