//! Get Promo Code Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use karat_app::domain::promocodes::models::PromoCodeUuid;

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    promocodes::{into_status_error, models::PromoCodeResponse},
    state::State,
};

/// Get Promo Code Handler
#[endpoint(
    tags("promocodes"),
    summary = "Get Promo Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Promo code"),
        (status_code = StatusCode::NOT_FOUND, description = "Promo code not found"),
    ),
)]
pub(crate) async fn handler(
    promo: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<PromoCodeResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let promo = state
        .app
        .promocodes
        .get_promocode(PromoCodeUuid::from_uuid(promo.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(ok(promo.into()))
}

#[cfg(test)]
mod tests {
    use karat_app::domain::promocodes::{MockPromoCodesService, PromoCodesServiceError};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::{
        promocodes::handlers::fixtures::fixed_promo,
        test_helpers::{admin_service, strict_app},
    };

    use super::*;

    fn make_service(promocodes: MockPromoCodesService) -> Service {
        let mut app = strict_app();
        app.promocodes = Arc::new(promocodes);

        admin_service(app, Router::with_path("promocodes/{promo}").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_promo() -> TestResult {
        let uuid = PromoCodeUuid::new();
        let mut promocodes = MockPromoCodesService::new();

        promocodes
            .expect_get_promocode()
            .once()
            .withf(move |id| *id == uuid)
            .return_once(move |_| Ok(fixed_promo(uuid, "FLAT300", 300)));

        let mut res = TestClient::get(format!("http://example.com/promocodes/{uuid}"))
            .send(&make_service(promocodes))
            .await;

        let body: Envelope<PromoCodeResponse> = res.take_json().await?;

        assert_eq!(body.data.id, uuid.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_promo_returns_404() -> TestResult {
        let mut promocodes = MockPromoCodesService::new();

        promocodes
            .expect_get_promocode()
            .once()
            .return_once(|_| Err(PromoCodesServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/promocodes/{}", Uuid::now_v7()))
            .send(&make_service(promocodes))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
