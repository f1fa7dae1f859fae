//! Create Rate Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use karat_app::domain::rates::models::NewMaterialRate;

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    rates::{
        into_status_error,
        models::{CreateRateRequest, RateResponse},
    },
    state::State,
};

/// Create Rate Handler
///
/// Records a rate snapshot. Rates are never edited; a mistaken rate is deleted and re-added.
#[endpoint(
    tags("rates"),
    summary = "Create Rate",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Rate recorded"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid material or unknown diamond type"),
    ),
)]
#[tracing::instrument(
    name = "rates.create",
    skip(json, depot, res),
    fields(material = tracing::field::Empty, rate = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateRateRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Envelope<RateResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let rate = NewMaterialRate::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record(
        "material",
        rate.material.label().unwrap_or_default().as_str(),
    );
    span.record("rate", tracing::field::display(rate.rate));

    let created = state
        .app
        .rates
        .create_rate(rate)
        .await
        .map_err(into_status_error)?;

    tracing::info!(rate_uuid = %created.uuid, "recorded rate");

    res.status_code(StatusCode::CREATED);

    Ok(ok(created.into()))
}
