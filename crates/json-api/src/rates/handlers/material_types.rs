//! Material Types Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    rates::{into_status_error, models::MaterialTypesResponse},
    state::State,
};

/// Material Types Handler
///
/// The current rate for every discriminator with a recorded rate, grouped by material and
/// labelled for display.
#[endpoint(tags("products"), summary = "Material Types")]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Envelope<MaterialTypesResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let catalog = state
        .app
        .rates
        .material_types()
        .await
        .map_err(into_status_error)?;

    Ok(ok(catalog.into()))
}
