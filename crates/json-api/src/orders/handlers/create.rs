//! Create Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use karat_app::domain::orders::models::NewOrder;

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    observability::record_order_created,
    orders::{
        into_status_error,
        models::{CreateOrderRequest, OrderResponse},
    },
    state::State,
};

/// Create Order Handler
///
/// Uses the client's cart prices for each line. The subtotal, promo discount and GST are
/// computed on the server.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid items or promo code rejected"),
        (status_code = StatusCode::NOT_FOUND, description = "Promo code not found"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(order_uuid = tracing::field::Empty, user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Envelope<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_403()?;
    let order = NewOrder::from(json.into_inner());

    tracing::Span::current()
        .record("order_uuid", tracing::field::display(order.uuid))
        .record("user_uuid", tracing::field::display(user));

    let created = state
        .app
        .orders
        .create_order(user, order)
        .await
        .map_err(into_status_error)?;

    record_order_created();

    tracing::info!(total = %created.total, "order placed");

    res.status_code(StatusCode::CREATED);

    Ok(ok(created.into()))
}

#[cfg(test)]
mod tests {
    use karat::promo::PromoRejection;
    use karat_app::domain::orders::{MockOrdersService, OrdersServiceError};
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        envelope::ErrorBody,
        orders::handlers::fixtures::pending_order,
        test_helpers::{TEST_USER_UUID, strict_app, user_service},
    };

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        let mut app = strict_app();
        app.orders = Arc::new(orders);

        user_service(app, Router::with_path("orders").post(handler))
    }

    #[tokio::test]
    async fn test_create_order_returns_201() -> TestResult {
        let product = Uuid::now_v7();
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(move |user, order| {
                *user == TEST_USER_UUID
                    && order.items.len() == 1
                    && order.items.iter().all(|item| {
                        item.product.into_uuid() == product
                            && item.price == Decimal::from(2000)
                            && item.quantity == 1
                    })
                    && order.shipping_address.as_ref().map(|a| a.country.as_str()) == Some("IN")
            })
            .return_once(|_, order| Ok(pending_order(order.uuid)));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "items": [{ "productId": product, "price": 2000, "quantity": 1 }],
                "shippingAddress": { "name": "Asha", "line1": "12 MG Road", "city": "Jaipur" },
            }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: Envelope<OrderResponse> = res.take_json().await?;

        assert_eq!(body.data.status, "pending");
        assert_eq!(body.data.tax, Decimal::from(60));
        assert_eq!(body.data.total, Decimal::from(2060));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_empty_order_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::MissingItems));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&json!({ "items": [] }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(body.message, "No items in order");

        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_promo_returns_reason() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_create_order().once().return_once(|_, _| {
            Err(OrdersServiceError::PromoRejected(
                PromoRejection::MinimumOrderValue {
                    minimum: Decimal::from(5000),
                },
            ))
        });

        let mut res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "items": [{ "productId": Uuid::now_v7(), "price": 2000, "quantity": 1 }],
                "promocodeId": Uuid::now_v7(),
            }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(body.message, "Minimum order value is 5000");
        assert_eq!(body.reason.as_deref(), Some("minimum_order_value"));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_promo_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::PromoNotFound));

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "items": [{ "productId": Uuid::now_v7(), "price": 2000, "quantity": 1 }],
                "promocodeId": Uuid::now_v7(),
            }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
