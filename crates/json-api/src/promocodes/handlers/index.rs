//! Promo Code Index Handler

use std::sync::Arc;

use karat_app::pagination::PageRequest;
use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    envelope::{Listing, listing},
    extensions::*,
    promocodes::{into_status_error, models::PromoCodeResponse},
    state::State,
};

/// Promo Code Index Handler
#[endpoint(
    tags("promocodes"),
    summary = "List Promo Codes",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<Listing<PromoCodeResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let promos = state
        .app
        .promocodes
        .list_promocodes(PageRequest::new(page.into_inner(), limit.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(listing(promos))
}

#[cfg(test)]
mod tests {
    use karat_app::{
        domain::promocodes::{MockPromoCodesService, models::PromoCodeUuid},
        pagination::Page,
    };
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::{
        promocodes::handlers::fixtures::fixed_promo,
        test_helpers::{admin_service, strict_app},
    };

    use super::*;

    #[tokio::test]
    async fn test_index_lists_promos() -> TestResult {
        let mut promocodes = MockPromoCodesService::new();

        promocodes
            .expect_list_promocodes()
            .once()
            .return_once(|page| {
                Ok(Page::new(
                    vec![fixed_promo(PromoCodeUuid::new(), "FLAT300", 300)],
                    1,
                    page,
                ))
            });

        let mut app = strict_app();
        app.promocodes = Arc::new(promocodes);

        let mut res = TestClient::get("http://example.com/promocodes")
            .send(&admin_service(
                app,
                Router::with_path("promocodes").get(handler),
            ))
            .await;

        let body: Listing<PromoCodeResponse> = res.take_json().await?;
        let promo = body.data.first().ok_or("expected one promo")?;

        assert_eq!(promo.code, "FLAT300");
        assert_eq!(promo.discount_type, "fixed");

        Ok(())
    }
}
