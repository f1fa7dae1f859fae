//! Update Promo Code Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use karat_app::domain::promocodes::models::{PromoCodeUpdate, PromoCodeUuid};

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    promocodes::{
        into_status_error,
        models::{PromoCodeResponse, UpdatePromoCodeRequest},
    },
    state::State,
};

/// Update Promo Code Handler
#[endpoint(
    tags("promocodes"),
    summary = "Update Promo Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Promo code updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Promo code not found"),
    ),
)]
#[tracing::instrument(
    name = "promocodes.update",
    skip(promo, json, depot),
    fields(promo_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    promo: PathParam<Uuid>,
    json: JsonBody<UpdatePromoCodeRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<PromoCodeResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let promo = promo.into_inner();
    let update = PromoCodeUpdate::try_from(json.into_inner())?;

    tracing::Span::current().record("promo_uuid", tracing::field::display(promo));

    let updated = state
        .app
        .promocodes
        .update_promocode(PromoCodeUuid::from_uuid(promo), update)
        .await
        .map_err(into_status_error)?;

    Ok(ok(updated.into()))
}

#[cfg(test)]
mod tests {
    use karat_app::domain::promocodes::{
        MockPromoCodesService, PromoCodesServiceError, models::PromoCode,
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        promocodes::handlers::fixtures::fixed_promo,
        test_helpers::{admin_service, strict_app},
    };

    use super::*;

    fn make_service(promocodes: MockPromoCodesService) -> Service {
        let mut app = strict_app();
        app.promocodes = Arc::new(promocodes);

        admin_service(app, Router::with_path("promocodes/{promo}").put(handler))
    }

    #[tokio::test]
    async fn test_update_deactivates_promo() -> TestResult {
        let uuid = PromoCodeUuid::new();
        let mut promocodes = MockPromoCodesService::new();

        promocodes
            .expect_update_promocode()
            .once()
            .withf(move |id, update| *id == uuid && update.is_active == Some(false))
            .return_once(|uuid, _| {
                Ok(PromoCode {
                    is_active: false,
                    ..fixed_promo(uuid, "FLAT300", 300)
                })
            });

        let mut res = TestClient::put(format!("http://example.com/promocodes/{uuid}"))
            .json(&json!({ "isActive": false }))
            .send(&make_service(promocodes))
            .await;

        let body: Envelope<PromoCodeResponse> = res.take_json().await?;

        assert!(!body.data.is_active, "promo should be inactive");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_promo_returns_404() -> TestResult {
        let mut promocodes = MockPromoCodesService::new();

        promocodes
            .expect_update_promocode()
            .once()
            .return_once(|_, _| Err(PromoCodesServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/promocodes/{}", Uuid::now_v7()))
            .json(&json!({ "amount": 10 }))
            .send(&make_service(promocodes))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
