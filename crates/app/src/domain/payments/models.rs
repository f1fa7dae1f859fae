//! Payment Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    domain::{orders::models::OrderUuid, users::models::UserUuid},
    uuids::TypedUuid,
};

/// Payment UUID
pub type PaymentUuid = TypedUuid<Payment>;

/// Provider name recorded on Razorpay payments.
pub const RAZORPAY_PROVIDER: &str = "razorpay";

/// Method recorded when the client names none.
pub const DEFAULT_METHOD: &str = "card";

/// The only currency the store charges in.
pub const CURRENCY: &str = "INR";

/// Meta key holding the gateway order id.
pub const RAZORPAY_ORDER_ID_KEY: &str = "razorpay_order_id";

/// Meta key holding the full gateway order.
pub const RAZORPAY_ORDER_KEY: &str = "razorpayOrder";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Created,
    Authorized,
    Captured,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub const ALL: [Self; 5] = [
        Self::Created,
        Self::Authorized,
        Self::Captured,
        Self::Failed,
        Self::Refunded,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Authorized => "authorized",
            Self::Captured => "captured",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    /// Status after a verified callback: `authorized` when the provider says so, otherwise
    /// `captured`.
    #[must_use]
    pub fn settled(provider_status: Option<&str>) -> Self {
        match provider_status.map(|status| status.trim().to_ascii_lowercase()) {
            Some(status) if status == "authorized" => Self::Authorized,
            _ => Self::Captured,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment status: {0}")]
pub struct UnknownPaymentStatus(pub String);

impl FromStr for PaymentStatus {
    type Err = UnknownPaymentStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownPaymentStatus(value.to_string()))
    }
}

/// Payment Model
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub uuid: PaymentUuid,
    pub order: OrderUuid,
    pub user: UserUuid,
    pub provider: String,
    pub method: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub meta: Map<String, Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Payment {
    /// The gateway order recorded at creation, when this is a Razorpay payment that has one.
    #[must_use]
    pub fn razorpay_order(&self) -> Option<&Value> {
        if self.provider != RAZORPAY_PROVIDER {
            return None;
        }

        self.meta
            .get(RAZORPAY_ORDER_KEY)
            .filter(|order| order.get("id").and_then(Value::as_str).is_some())
    }
}

/// New Payment Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub uuid: PaymentUuid,
    pub order: OrderUuid,
    pub user: UserUuid,
    pub provider: String,
    pub method: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub meta: Map<String, Value>,
}

/// What the storefront needs to open the Razorpay checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct RazorpayCheckout {
    pub key_id: String,
    pub razorpay_order: Value,
    pub payment: PaymentUuid,

    /// False when an earlier checkout for the order was returned.
    pub created: bool,
}

/// Fields posted back by the Razorpay checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RazorpayCallback {
    pub order: OrderUuid,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

impl RazorpayCallback {
    /// Every gateway field is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [
            &self.razorpay_order_id,
            &self.razorpay_payment_id,
            &self.razorpay_signature,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

/// Why a callback was refused. Each refusal marks the payment failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum VerificationFailure {
    #[error("Invalid Razorpay signature")]
    InvalidSignature,

    #[error("Payment order mismatch")]
    OrderIdMismatch,

    #[error("Payment amount mismatch")]
    AmountMismatch,
}

impl VerificationFailure {
    /// Machine-readable reason, also written to the payment meta.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::InvalidSignature => "invalid_signature",
            Self::OrderIdMismatch => "order_id_mismatch",
            Self::AmountMismatch => "amount_mismatch",
        }
    }
}
