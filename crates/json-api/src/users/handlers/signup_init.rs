//! Signup Init Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::into_status_error,
    envelope::{Envelope, ok},
    extensions::*,
    state::State,
    users::models::OtpSentResponse,
};

/// Signup Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignupRequest {
    pub email: String,
    pub full_name: String,
}

/// Signup Init Handler
///
/// Emails a code to a new address. The account is created once the code is verified.
#[endpoint(
    tags("users"),
    summary = "Start Signup",
    responses(
        (status_code = StatusCode::OK, description = "OTP sent"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid email or missing name"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<SignupRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OtpSentResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let dispatch = state
        .app
        .auth
        .signup_init(&request.email, &request.full_name)
        .await
        .map_err(into_status_error)?;

    Ok(ok(dispatch.into()))
}
