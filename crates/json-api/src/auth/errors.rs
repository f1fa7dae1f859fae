//! Auth Errors

use karat_app::auth::AuthServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::InvalidEmail
        | AuthServiceError::MissingFullName
        | AuthServiceError::OtpNotRequested
        | AuthServiceError::OtpExpired
        | AuthServiceError::InvalidOtp => StatusError::bad_request().brief(error.to_string()),
        AuthServiceError::InvalidCredentials | AuthServiceError::InvalidToken => {
            StatusError::unauthorized().brief(error.to_string())
        }
        AuthServiceError::AlreadyRegistered => StatusError::conflict().brief(error.to_string()),
        AuthServiceError::Blocked => StatusError::forbidden().brief(error.to_string()),
        AuthServiceError::UserNotFound => StatusError::not_found().brief(error.to_string()),
        AuthServiceError::TooManyAttempts => {
            StatusError::too_many_requests().brief(error.to_string())
        }
        AuthServiceError::NotConfigured => {
            StatusError::service_unavailable().brief("Admin login is not configured")
        }
        AuthServiceError::Token(source) => {
            error!("failed to issue token: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Sql(source) => {
            error!("auth storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
