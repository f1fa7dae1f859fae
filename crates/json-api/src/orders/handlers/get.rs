//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use karat_app::domain::orders::models::OrderUuid;

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    orders::{into_status_error, models::OrderResponse},
    state::State,
};

/// Get Order Handler
///
/// Orders placed by other users are reported as not found.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_403()?;

    let order = state
        .app
        .orders
        .get_order(user, OrderUuid::from_uuid(order.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(ok(order.into()))
}

#[cfg(test)]
mod tests {
    use karat_app::domain::orders::{MockOrdersService, OrdersServiceError};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::{
        envelope::ErrorBody,
        orders::handlers::fixtures::pending_order,
        test_helpers::{TEST_USER_UUID, strict_app, user_service},
    };

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        let mut app = strict_app();
        app.orders = Arc::new(orders);

        user_service(app, Router::with_path("orders/{order}").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_callers_order() -> TestResult {
        let uuid = OrderUuid::new();
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |user, order| *user == TEST_USER_UUID && *order == uuid)
            .return_once(|_, order| Ok(pending_order(order)));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders))
            .await;

        let body: Envelope<OrderResponse> = res.take_json().await?;

        assert_eq!(body.data.id, uuid.into_uuid());
        assert_eq!(
            body.data.items.first().map(|item| item.name.as_str()),
            Some("Silver Pendant")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_get_other_users_order_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let mut res = TestClient::get(format!("http://example.com/orders/{}", Uuid::now_v7()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(body.message, "Order not found");

        Ok(())
    }
}
