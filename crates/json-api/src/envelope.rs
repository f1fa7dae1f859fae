//! Response envelopes
//!
//! Successful responses are wrapped as `{ok: true, data}`; list responses add `page`, `limit`
//! and `total`. The catcher renders every error response as `{ok: false, message, reason?}`,
//! taking the message from [`StatusError::brief`] and the reason from [`StatusError::detail`].

use karat_app::pagination::Page;
use salvo::{
    http::ResBody,
    oapi::ToSchema,
    prelude::*,
};
use serde::{Deserialize, Serialize};

/// Message for every 500 response. Details stay in the logs.
pub(crate) const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Successful response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct Envelope<T: ToSchema + 'static> {
    /// Always `true`
    pub ok: bool,

    /// Response payload
    pub data: T,
}

/// One page of a list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct Listing<T: ToSchema + 'static> {
    /// Always `true`
    pub ok: bool,

    /// Items on this page
    pub data: Vec<T>,

    /// 1-based page number
    pub page: u32,

    /// Page size
    pub limit: u32,

    /// Items across all pages
    pub total: u64,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorBody {
    /// Always `false`
    pub ok: bool,

    /// Human-readable message
    pub message: String,

    /// Machine-readable failure reason, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Wrap a payload in a success envelope.
pub(crate) fn ok<T: ToSchema + 'static>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { ok: true, data })
}

/// Wrap a page, converting each item.
pub(crate) fn listing<T, U>(page: Page<T>) -> Json<Listing<U>>
where
    U: ToSchema + From<T> + 'static,
{
    Json(Listing {
        ok: true,
        data: page.items.into_iter().map(U::from).collect(),
        page: page.page,
        limit: page.limit,
        total: page.total,
    })
}

/// A 400 carrying a machine-readable reason.
pub(crate) fn rejected(message: impl Into<String>, reason: &str) -> StatusError {
    StatusError::bad_request().brief(message).detail(reason)
}

/// Catcher hoop rendering error responses in the error envelope.
#[handler]
pub(crate) async fn render_errors(res: &mut Response, ctrl: &mut FlowCtrl) {
    let status = res.status_code.unwrap_or(StatusCode::NOT_FOUND);

    if !status.is_client_error() && !status.is_server_error() {
        return;
    }

    let (message, reason) = match res.take_body() {
        _ if status == StatusCode::INTERNAL_SERVER_ERROR => {
            (INTERNAL_ERROR_MESSAGE.to_string(), None)
        }
        ResBody::Error(error) if !error.brief.trim().is_empty() => (error.brief, error.detail),
        _ => (
            status
                .canonical_reason()
                .unwrap_or(INTERNAL_ERROR_MESSAGE)
                .to_string(),
            None,
        ),
    };

    res.status_code(status);
    res.render(Json(ErrorBody {
        ok: false,
        message,
        reason,
    }));

    ctrl.skip_rest();
}
