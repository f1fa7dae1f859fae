//! Rate Index Handler

use std::sync::Arc;

use karat::material::MaterialKind;
use karat_app::pagination::PageRequest;
use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    envelope::{Listing, listing},
    extensions::*,
    rates::{into_status_error, models::RateResponse},
    state::State,
};

/// Rate Index Handler
///
/// Lists recorded rates, newest first. `?material=gold` narrows to one material.
#[endpoint(
    tags("rates"),
    summary = "List Rates",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(
    material: QueryParam<String, false>,
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<Listing<RateResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let material = material
        .into_inner()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            raw.parse::<MaterialKind>()
                .map_err(|error| StatusError::bad_request().brief(error.to_string()))
        })
        .transpose()?;

    let rates = state
        .app
        .rates
        .list_rates(
            material,
            PageRequest::new(page.into_inner(), limit.into_inner()),
        )
        .await
        .map_err(into_status_error)?;

    Ok(listing(rates))
}
