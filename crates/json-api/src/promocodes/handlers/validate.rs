//! Validate Promo Code Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    promocodes::{
        into_status_error,
        models::{PromoValidationResponse, ValidatePromoCodeRequest},
    },
    state::State,
};

/// Validate Promo Code Handler
///
/// Storefront preview of a code against a cart total. Nothing is redeemed; orders re-check
/// the code when they are placed.
#[endpoint(
    tags("promocodes"),
    summary = "Validate Promo Code",
    responses(
        (status_code = StatusCode::OK, description = "Code applies"),
        (status_code = StatusCode::BAD_REQUEST, description = "Code rejected; `reason` says why"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown code"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ValidatePromoCodeRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<PromoValidationResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let validation = state
        .app
        .promocodes
        .validate(&request.code, request.order_total, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(ok(validation.into()))
}

#[cfg(test)]
mod tests {
    use karat::promo::{PromoOutcome, PromoRejection};
    use karat_app::domain::promocodes::{
        MockPromoCodesService, PromoCodesServiceError,
        models::{PromoCodeUuid, PromoValidation},
    };
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        envelope::ErrorBody,
        promocodes::handlers::fixtures::fixed_promo,
        test_helpers::{public_service, strict_app},
    };

    use super::*;

    fn make_service(promocodes: MockPromoCodesService) -> Service {
        let mut app = strict_app();
        app.promocodes = Arc::new(promocodes);

        public_service(app, Router::with_path("promocodes/validate").post(handler))
    }

    #[tokio::test]
    async fn test_validate_returns_discount() -> TestResult {
        let mut promocodes = MockPromoCodesService::new();

        promocodes
            .expect_validate()
            .once()
            .withf(|code, total, _| code == "flat300" && *total == Decimal::from(2_000))
            .return_once(|_, _, _| {
                Ok(PromoValidation {
                    promo: fixed_promo(PromoCodeUuid::new(), "FLAT300", 300),
                    outcome: PromoOutcome {
                        discount: Decimal::from(300),
                        total_after: Decimal::from(1_700),
                    },
                })
            });

        let mut res = TestClient::post("http://example.com/promocodes/validate")
            .json(&json!({ "code": "flat300", "orderTotal": 2000 }))
            .send(&make_service(promocodes))
            .await;

        let body: Envelope<PromoValidationResponse> = res.take_json().await?;

        assert_eq!(body.data.discount, Decimal::from(300));
        assert_eq!(body.data.total_after, Decimal::from(1_700));
        assert_eq!(body.data.promo.code, "FLAT300");

        Ok(())
    }

    #[tokio::test]
    async fn test_validate_below_minimum_returns_reason() -> TestResult {
        let mut promocodes = MockPromoCodesService::new();

        promocodes.expect_validate().once().return_once(|_, _, _| {
            Err(PromoCodesServiceError::Rejected(
                PromoRejection::MinimumOrderValue {
                    minimum: Decimal::from(5_000),
                },
            ))
        });

        let mut res = TestClient::post("http://example.com/promocodes/validate")
            .json(&json!({ "code": "BIGSPEND", "orderTotal": 2000 }))
            .send(&make_service(promocodes))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(body.message, "Minimum order value is 5000");
        assert_eq!(body.reason.as_deref(), Some("minimum_order_value"));

        Ok(())
    }

    #[tokio::test]
    async fn test_validate_unknown_code_returns_404() -> TestResult {
        let mut promocodes = MockPromoCodesService::new();

        promocodes
            .expect_validate()
            .once()
            .return_once(|_, _, _| Err(PromoCodesServiceError::NotFound));

        let res = TestClient::post("http://example.com/promocodes/validate")
            .json(&json!({ "code": "NOPE", "orderTotal": 2000 }))
            .send(&make_service(promocodes))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
