//! Admin request and response models.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// Admin credentials.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

/// The calling admin.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AdminResponse {
    pub email: String,
}

/// Block or unblock a customer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BlockUserRequest {
    pub blocked: bool,
}
