//! Delete Rate Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use karat_app::domain::rates::models::RateUuid;

use crate::{extensions::*, rates::into_status_error, state::State};

/// Delete Rate Handler
#[endpoint(
    tags("rates"),
    summary = "Delete Rate",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Rate deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Rate not found"),
    ),
)]
pub(crate) async fn handler(
    rate: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let rate = rate.into_inner();

    state
        .app
        .rates
        .delete_rate(RateUuid::from_uuid(rate))
        .await
        .map_err(into_status_error)?;

    tracing::info!(rate_uuid = %rate, "deleted rate");

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}
