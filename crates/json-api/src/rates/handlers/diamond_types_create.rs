//! Create Diamond Type Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use karat_app::domain::rates::models::NewDiamondType;

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    rates::{
        into_status_error,
        models::{CreateDiamondTypeRequest, DiamondTypeResponse},
    },
    state::State,
};

/// Create Diamond Type Handler
#[endpoint(
    tags("rates"),
    summary = "Create Diamond Type",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Diamond type created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown origin or cut"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateDiamondTypeRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Envelope<DiamondTypeResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let diamond_type = NewDiamondType::try_from(json.into_inner())?;

    let created = state
        .app
        .rates
        .create_diamond_type(diamond_type)
        .await
        .map_err(into_status_error)?;

    tracing::info!(diamond_type_uuid = %created.uuid, "created diamond type");

    res.status_code(StatusCode::CREATED);

    Ok(ok(created.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use karat_app::domain::rates::{
        MockRatesService,
        models::{DiamondCut, DiamondOrigin, DiamondType},
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{admin_service, strict_app};

    use super::*;

    fn make_service(rates: MockRatesService) -> Service {
        let mut app = strict_app();
        app.rates = Arc::new(rates);

        admin_service(app, Router::with_path("diamond-types").post(handler))
    }

    #[tokio::test]
    async fn test_create_diamond_type_returns_201() -> TestResult {
        let mut rates = MockRatesService::new();

        rates
            .expect_create_diamond_type()
            .once()
            .withf(|new| new.origin == DiamondOrigin::LabGrown && new.cut == DiamondCut::Good)
            .return_once(|new| {
                Ok(DiamondType {
                    uuid: new.uuid,
                    origin: new.origin,
                    shape: new.shape,
                    cut: new.cut,
                    color: new.color,
                    clarity: new.clarity,
                    created_at: Timestamp::UNIX_EPOCH,
                    updated_at: Timestamp::UNIX_EPOCH,
                })
            });

        let mut res = TestClient::post("http://example.com/diamond-types")
            .json(&json!({
                "origin": "lab_grown",
                "shape": "Oval",
                "cut": "good",
                "color": "F",
                "clarity": "VS1"
            }))
            .send(&make_service(rates))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: Envelope<DiamondTypeResponse> = res.take_json().await?;

        assert_eq!(body.data.cut, "good");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_diamond_type_unknown_origin_returns_400() -> TestResult {
        let res = TestClient::post("http://example.com/diamond-types")
            .json(&json!({
                "origin": "synthetic-ish",
                "shape": "Oval",
                "cut": "good",
                "color": "F",
                "clarity": "VS1"
            }))
            .send(&make_service(MockRatesService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
