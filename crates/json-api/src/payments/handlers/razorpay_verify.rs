//! Verify Razorpay Payment Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use karat_app::domain::payments::{PaymentsServiceError, models::RazorpayCallback};

use crate::{
    envelope::{Envelope, ok},
    extensions::*,
    observability::record_payment_verification,
    payments::{
        into_status_error,
        models::{PaymentResponse, VerifyRazorpayRequest},
    },
    state::State,
};

/// Verify Razorpay Payment Handler
///
/// Checks the checkout signature, then the payment as the gateway reports it. Refusals
/// respond 400 with the reason and leave the payment failed.
#[endpoint(
    tags("payments"),
    summary = "Verify Razorpay Payment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Payment verified"),
        (status_code = StatusCode::BAD_REQUEST, description = "Verification refused"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Razorpay not configured"),
    ),
)]
#[tracing::instrument(
    name = "payments.razorpay_verify",
    skip(json, depot),
    fields(order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<VerifyRazorpayRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<PaymentResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_403()?;
    let callback = RazorpayCallback::from(json.into_inner());

    tracing::Span::current().record("order_uuid", tracing::field::display(callback.order));

    let payment = match state.app.payments.verify_razorpay(user, callback).await {
        Ok(payment) => payment,
        Err(PaymentsServiceError::VerificationFailed(failure)) => {
            record_payment_verification(failure.reason());

            tracing::warn!(reason = failure.reason(), "razorpay verification refused");

            return Err(into_status_error(PaymentsServiceError::VerificationFailed(
                failure,
            )));
        }
        Err(error) => return Err(into_status_error(error)),
    };

    record_payment_verification("verified");

    tracing::info!(payment_uuid = %payment.uuid, status = %payment.status, "payment verified");

    Ok(ok(payment.into()))
}

#[cfg(test)]
mod tests {
    use karat_app::domain::payments::{
        MockPaymentsService,
        models::{PaymentStatus, PaymentUuid, VerificationFailure},
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        envelope::ErrorBody,
        payments::handlers::fixtures::razorpay_payment,
        test_helpers::{strict_app, user_service},
    };

    use super::*;

    fn make_service(payments: MockPaymentsService) -> Service {
        let mut app = strict_app();
        app.payments = Arc::new(payments);

        user_service(app, Router::with_path("payments/razorpay/verify").post(handler))
    }

    #[tokio::test]
    async fn test_verified_payment_is_captured() -> TestResult {
        let order = Uuid::now_v7();
        let mut payments = MockPaymentsService::new();

        payments
            .expect_verify_razorpay()
            .once()
            .withf(move |_, callback| {
                callback.order.into_uuid() == order
                    && callback.razorpay_payment_id == "pay_1"
                    && callback.razorpay_signature == "sig"
            })
            .return_once(|_, callback| {
                let mut payment =
                    razorpay_payment(PaymentUuid::new(), callback.order, PaymentStatus::Captured);
                payment.transaction_id = Some(callback.razorpay_payment_id);

                Ok(payment)
            });

        let mut res = TestClient::post("http://example.com/payments/razorpay/verify")
            .json(&json!({
                "orderId": order,
                "razorpay_order_id": "order_rzp1",
                "razorpay_payment_id": "pay_1",
                "razorpay_signature": "sig",
            }))
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: Envelope<PaymentResponse> = res.take_json().await?;

        assert_eq!(body.data.status, "captured");
        assert_eq!(body.data.transaction_id.as_deref(), Some("pay_1"));

        Ok(())
    }

    #[tokio::test]
    async fn test_bad_signature_returns_reason() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments.expect_verify_razorpay().once().return_once(|_, _| {
            Err(PaymentsServiceError::VerificationFailed(
                VerificationFailure::InvalidSignature,
            ))
        });

        let mut res = TestClient::post("http://example.com/payments/razorpay/verify")
            .json(&json!({
                "orderId": Uuid::now_v7(),
                "razorpay_order_id": "order_rzp1",
                "razorpay_payment_id": "pay_1",
                "razorpay_signature": "forged",
            }))
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(body.message, "Invalid Razorpay signature");
        assert_eq!(body.reason.as_deref(), Some("invalid_signature"));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_fields_returns_400() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_verify_razorpay()
            .once()
            .withf(|_, callback| !callback.is_complete())
            .return_once(|_, _| Err(PaymentsServiceError::MissingFields));

        let mut res = TestClient::post("http://example.com/payments/razorpay/verify")
            .json(&json!({ "orderId": Uuid::now_v7(), "razorpay_order_id": "order_rzp1" }))
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(body.message, "Missing Razorpay fields");

        Ok(())
    }
}
