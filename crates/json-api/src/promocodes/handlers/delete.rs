//! Delete Promo Code Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use karat_app::domain::promocodes::models::PromoCodeUuid;

use crate::{extensions::*, promocodes::into_status_error, state::State};

/// Delete Promo Code Handler
#[endpoint(
    tags("promocodes"),
    summary = "Delete Promo Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Promo code deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Promo code not found"),
    ),
)]
pub(crate) async fn handler(
    promo: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let promo = promo.into_inner();

    state
        .app
        .promocodes
        .delete_promocode(PromoCodeUuid::from_uuid(promo))
        .await
        .map_err(into_status_error)?;

    tracing::info!(promo_uuid = %promo, "deleted promo code");

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}
