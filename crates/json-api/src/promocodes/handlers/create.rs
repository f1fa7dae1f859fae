//! Create Promo Code Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use karat_app::domain::promocodes::models::NewPromoCode;

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    promocodes::{
        into_status_error,
        models::{CreatePromoCodeRequest, PromoCodeResponse},
    },
    state::State,
};

/// Create Promo Code Handler
#[endpoint(
    tags("promocodes"),
    summary = "Create Promo Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Promo code created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid promo code"),
        (status_code = StatusCode::CONFLICT, description = "Code already exists"),
    ),
)]
#[tracing::instrument(name = "promocodes.create", skip(json, depot, res), err)]
pub(crate) async fn handler(
    json: JsonBody<CreatePromoCodeRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Envelope<PromoCodeResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let promo = NewPromoCode::try_from(json.into_inner())?;

    let created = state
        .app
        .promocodes
        .create_promocode(promo)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(ok(created.into()))
}

#[cfg(test)]
mod tests {
    use karat::promo::DiscountType;
    use karat_app::domain::promocodes::{MockPromoCodesService, PromoCodesServiceError};
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

        admin_service(app, Router::with_path("promocodes").post(handler))
    }

    #[tokio::test]
    async fn test_create_returns_201() -> TestResult {
        let mut promocodes = MockPromoCodesService::new();

        promocodes
            .expect_create_promocode()
            .once()
            .withf(|promo| promo.discount_type == DiscountType::Fixed && promo.is_active)
            .return_once(|promo| Ok(fixed_promo(promo.uuid, "FLAT300", 300)));

        let mut res = TestClient::post("http://example.com/promocodes")
            .json(&json!({ "code": "flat300", "discountType": "fixed", "amount": 300 }))
            .send(&make_service(promocodes))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: Envelope<PromoCodeResponse> = res.take_json().await?;

        assert_eq!(body.data.code, "FLAT300");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_duplicate_code_returns_409() -> TestResult {
        let mut promocodes = MockPromoCodesService::new();

        promocodes
            .expect_create_promocode()
            .once()
            .return_once(|_| Err(PromoCodesServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/promocodes")
            .json(&json!({ "code": "FLAT300", "discountType": "fixed", "amount": 300 }))
            .send(&make_service(promocodes))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_percent_over_100_returns_400() -> TestResult {
        let mut promocodes = MockPromoCodesService::new();

        promocodes
            .expect_create_promocode()
            .once()
            .return_once(|_| Err(PromoCodesServiceError::InvalidData));

        let res = TestClient::post("http://example.com/promocodes")
            .json(&json!({ "code": "HUGE", "discountType": "percent", "amount": 150 }))
            .send(&make_service(promocodes))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
