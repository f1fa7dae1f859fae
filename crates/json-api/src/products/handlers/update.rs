//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use karat_app::domain::products::models::{ProductUpdate, ProductUuid};

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    products::{
        into_status_error,
        models::{ProductResponse, UpdateProductRequest},
    },
    state::State,
};

/// Update Product Handler
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip(product, json, depot),
    fields(product_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<UpdateProductRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<ProductResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = product.into_inner();
    let update = ProductUpdate::try_from(json.into_inner())?;

    tracing::Span::current().record("product_uuid", tracing::field::display(product));

    let updated = state
        .app
        .products
        .update_product(ProductUuid::from_uuid(product), update)
        .await
        .map_err(into_status_error)?;

    tracing::info!(product_uuid = %product, "updated product");

    Ok(ok(updated.into()))
}

#[cfg(test)]
mod tests {
    use karat_app::domain::products::{MockProductsService, ProductsServiceError};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        products::handlers::fixtures::gold_ring,
        test_helpers::{admin_service, strict_app},
    };

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        let mut app = strict_app();
        app.products = Arc::new(products);

        admin_service(app, Router::with_path("products/{product}").put(handler))
    }

    #[tokio::test]
    async fn test_update_applies_partial_fields() -> TestResult {
        let uuid = ProductUuid::new();
        let mut products = MockProductsService::new();

        products
            .expect_update_product()
            .once()
            .withf(move |id, update| {
                *id == uuid
                    && update.stock == Some(9)
                    && update.name.is_none()
                    && update.material.is_none()
            })
            .return_once(|uuid, _| Ok(gold_ring(uuid)));

        let mut res = TestClient::put(format!("http://example.com/products/{uuid}"))
            .json(&json!({ "stock": 9 }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: Envelope<ProductResponse> = res.take_json().await?;

        assert_eq!(body.data.id, uuid.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_404() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_update_product()
            .once()
            .return_once(|_, _| Err(ProductsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/products/{}", Uuid::now_v7()))
            .json(&json!({ "isActive": false }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_rejects_non_uuid_path() -> TestResult {
        let res = TestClient::put("http://example.com/products/classic-band")
            .json(&json!({ "stock": 1 }))
            .send(&make_service(MockProductsService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
