//! Delete Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use karat_app::domain::products::models::ProductUuid;

use crate::{extensions::*, products::into_status_error, state::State};

/// Delete Product Handler
#[endpoint(
    tags("products"),
    summary = "Delete Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Product deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = product.into_inner();

    state
        .app
        .products
        .delete_product(ProductUuid::from_uuid(product))
        .await
        .map_err(into_status_error)?;

    tracing::info!(product_uuid = %product, "deleted product");

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}

#[cfg(test)]
mod tests {
    use karat_app::domain::products::{MockProductsService, ProductsServiceError};
    use salvo::test::TestClient;
    use testresult::TestResult;

    use crate::test_helpers::{admin_service, strict_app, user_service};

    use super::*;

    fn route() -> Router {
        Router::with_path("products/{product}").delete(handler)
    }

    #[tokio::test]
    async fn test_delete_returns_204() -> TestResult {
        let uuid = ProductUuid::new();
        let mut products = MockProductsService::new();

        products
            .expect_delete_product()
            .once()
            .withf(move |id| *id == uuid)
            .return_once(|_| Ok(()));

        let mut app = strict_app();
        app.products = Arc::new(products);

        let res = TestClient::delete(format!("http://example.com/products/{uuid}"))
            .send(&admin_service(app, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_product_returns_404() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_delete_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        let mut app = strict_app();
        app.products = Arc::new(products);

        let res = TestClient::delete(format!("http://example.com/products/{}", Uuid::now_v7()))
            .send(&admin_service(app, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_as_customer_is_refused() -> TestResult {
        use crate::auth::middleware::admin_only;

        let res = TestClient::delete(format!("http://example.com/products/{}", Uuid::now_v7()))
            .send(&user_service(strict_app(), route().hoop(admin_only)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
