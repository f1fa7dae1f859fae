//! Payment request and response models.

use karat_app::domain::{
    orders::models::OrderUuid,
    payments::models::{Payment, RazorpayCallback, RazorpayCheckout},
};
use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A payment attempt.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub provider: String,
    pub method: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub amount: Decimal,

    pub currency: String,

    /// `created`, `authorized`, `captured`, `failed` or `refunded`
    pub status: String,

    pub transaction_id: Option<String>,

    /// Gateway records and failure reasons
    pub meta: Value,

    pub created_at: String,
    pub updated_at: String,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.uuid.into_uuid(),
            order_id: payment.order.into_uuid(),
            user_id: payment.user.into_uuid(),
            provider: payment.provider,
            method: payment.method,
            amount: payment.amount,
            currency: payment.currency,
            status: payment.status.as_str().to_string(),
            transaction_id: payment.transaction_id,
            meta: Value::Object(payment.meta),
            created_at: payment.created_at.to_string(),
            updated_at: payment.updated_at.to_string(),
        }
    }
}

/// Create Razorpay Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateRazorpayOrderRequest {
    pub order_id: Uuid,

    /// Defaults to `card`
    #[serde(default)]
    pub method: Option<String>,
}

/// What the storefront needs to open the Razorpay checkout.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RazorpayCheckoutResponse {
    pub key_id: String,

    /// The gateway order as returned by Razorpay
    pub razorpay_order: Value,

    pub payment_id: Uuid,
}

impl From<RazorpayCheckout> for RazorpayCheckoutResponse {
    fn from(checkout: RazorpayCheckout) -> Self {
        Self {
            key_id: checkout.key_id,
            razorpay_order: checkout.razorpay_order,
            payment_id: checkout.payment.into_uuid(),
        }
    }
}

/// Verify Razorpay Payment Request
///
/// Gateway fields keep Razorpay's snake case names.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifyRazorpayRequest {
    #[serde(rename = "orderId")]
    pub order_id: Uuid,

    #[serde(default)]
    pub razorpay_order_id: Option<String>,

    #[serde(default)]
    pub razorpay_payment_id: Option<String>,

    #[serde(default)]
    pub razorpay_signature: Option<String>,
}

impl From<VerifyRazorpayRequest> for RazorpayCallback {
    fn from(request: VerifyRazorpayRequest) -> Self {
        RazorpayCallback {
            order: OrderUuid::from_uuid(request.order_id),
            razorpay_order_id: request.razorpay_order_id.unwrap_or_default(),
            razorpay_payment_id: request.razorpay_payment_id.unwrap_or_default(),
            razorpay_signature: request.razorpay_signature.unwrap_or_default(),
        }
    }
}
