//! Login Init Handler

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

/// Login Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub email: String,
}

/// Login Init Handler
#[endpoint(
    tags("users"),
    summary = "Start Login",
    responses(
        (status_code = StatusCode::OK, description = "OTP sent"),
        (status_code = StatusCode::FORBIDDEN, description = "Account blocked"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OtpSentResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let dispatch = state
        .app
        .auth
        .login_init(&json.into_inner().email)
        .await
        .map_err(into_status_error)?;

    Ok(ok(dispatch.into()))
}

#[cfg(test)]
mod tests {
    use karat_app::auth::{AuthServiceError, MockAuthService, OtpDispatch};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;
    use zeroize::Zeroizing;

    use crate::test_helpers::{public_service, strict_app};

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        let mut app = strict_app();
        app.auth = Arc::new(auth);

        public_service(app, Router::with_path("users/login/init").post(handler))
    }

    #[tokio::test]
    async fn test_login_init_exposes_otp_when_enabled() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_login_init()
            .once()
            .withf(|email| email == "asha@example.com")
            .return_once(|_| {
                Ok(OtpDispatch {
                    otp: Some(Zeroizing::new("482913".to_string())),
                })
            });

        let mut res = TestClient::post("http://example.com/users/login/init")
            .json(&json!({ "email": "asha@example.com" }))
            .send(&make_service(auth))
            .await;

        let body: Envelope<OtpSentResponse> = res.take_json().await?;

        assert_eq!(body.data.otp.as_deref(), Some("482913"));

        Ok(())
    }

    #[tokio::test]
    async fn test_login_init_blocked_user_returns_403() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_login_init()
            .once()
            .return_once(|_| Err(AuthServiceError::Blocked));

        let res = TestClient::post("http://example.com/users/login/init")
            .json(&json!({ "email": "asha@example.com" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_login_init_unknown_user_returns_404() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_login_init()
            .once()
            .return_once(|_| Err(AuthServiceError::UserNotFound));

        let res = TestClient::post("http://example.com/users/login/init")
            .json(&json!({ "email": "nobody@example.com" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
