//! User response models.

use karat_app::{
    auth::{IssuedToken, OtpDispatch, Session},
    domain::users::models::User,
};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A customer account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub is_blocked: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.uuid.into_uuid(),
            email: user.email,
            full_name: user.full_name,
            is_blocked: user.is_blocked,
            created_at: user.created_at.to_string(),
            updated_at: user.updated_at.to_string(),
        }
    }
}

/// Returned by every login or signup init step.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OtpSentResponse {
    pub message: String,

    /// The issued code, only when exposure is enabled for development
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

impl From<OtpDispatch> for OtpSentResponse {
    fn from(dispatch: OtpDispatch) -> Self {
        Self {
            message: "OTP sent".to_string(),
            otp: dispatch.otp.map(|otp| otp.as_str().to_string()),
        }
    }
}

/// A bearer token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenResponse {
    pub token: String,
    pub expires_at: String,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            expires_at: issued.expires_at.to_string(),
        }
    }
}

/// A verified customer with their bearer token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionResponse {
    pub token: String,
    pub expires_at: String,
    pub user: UserResponse,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            token: session.token.token,
            expires_at: session.token.expires_at.to_string(),
            user: session.user.into(),
        }
    }
}

/// Email plus emailed code.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}
