//! Remove From Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use karat_app::domain::products::models::ProductUuid;

use crate::{carts::into_status_error, extensions::*, state::State};

/// Remove From Cart Handler
///
/// Removing a product that is not in the cart also succeeds.
#[endpoint(
    tags("cart"),
    summary = "Remove From Cart",
    security(("bearer_auth" = [])),
    responses((status_code = StatusCode::NO_CONTENT, description = "Line removed")),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_403()?;

    state
        .app
        .carts
        .remove_item(user, ProductUuid::from_uuid(product.into_inner()))
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}

#[cfg(test)]
mod tests {
    use karat_app::domain::carts::MockCartsService;
    use salvo::test::TestClient;
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USER_UUID, strict_app, user_service};

    use super::*;

    #[tokio::test]
    async fn test_remove_returns_204() -> TestResult {
        let product = ProductUuid::new();
        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .withf(move |user, id| *user == TEST_USER_UUID && *id == product)
            .return_once(|_, _| Ok(()));

        let mut app = strict_app();
        app.carts = Arc::new(carts);

        let res = TestClient::delete(format!("http://example.com/cart/{product}"))
            .send(&user_service(
                app,
                Router::with_path("cart/{product}").delete(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }
}
