//! Diamond Type Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    rates::{into_status_error, models::DiamondTypeResponse},
    state::State,
};

/// Diamond Type Index Handler
#[endpoint(
    tags("rates"),
    summary = "List Diamond Types",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Envelope<Vec<DiamondTypeResponse>>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let diamond_types = state
        .app
        .rates
        .list_diamond_types()
        .await
        .map_err(into_status_error)?;

    Ok(ok(diamond_types.into_iter().map(Into::into).collect()))
}
