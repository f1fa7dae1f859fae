//! Payment gateway seam.

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Order creation request in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayOrderRequest {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: GatewayOrderNotes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOrderNotes {
    pub order_id: String,
    pub user_id: String,
}

/// Order as created by the gateway. `raw` is the full provider body.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayOrder {
    pub id: String,
    pub raw: Value,
}

/// Provider view of a payment. Missing fields are left unchecked.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayPayment {
    pub id: String,
    pub status: Option<String>,
    pub order_id: Option<String>,
    pub amount: Option<i64>,
    pub raw: Value,
}

impl GatewayPayment {
    /// Read the fields reconciliation relies on out of a provider body.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnexpectedResponse`] when the body carries no payment id.
    pub fn from_raw(raw: Value) -> Result<Self, GatewayError> {
        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::UnexpectedResponse("payment without id".to_string()))?
            .to_string();

        Ok(Self {
            id,
            status: raw.get("status").and_then(Value::as_str).map(str::to_string),
            order_id: raw
                .get("order_id")
                .and_then(Value::as_str)
                .map(str::to_string),
            amount: raw.get("amount").and_then(Value::as_i64),
            raw,
        })
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed")]
    Http(#[from] reqwest::Error),

    #[error("unexpected gateway response: {0}")]
    UnexpectedResponse(String),
}

/// Hosted payment provider.
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key the checkout widget is opened with.
    fn key_id(&self) -> String;

    /// Check a checkout callback signature in constant time.
    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;

    async fn create_order(&self, request: GatewayOrderRequest)
    -> Result<GatewayOrder, GatewayError>;

    async fn fetch_payment(&self, payment_id: &str) -> Result<GatewayPayment, GatewayError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn payment_fields_are_optional() -> TestResult {
        let payment = GatewayPayment::from_raw(json!({ "id": "pay_1" }))?;

        assert_eq!(payment.id, "pay_1");
        assert_eq!(payment.order_id, None);
        assert_eq!(payment.amount, None);

        Ok(())
    }

    #[test]
    fn payment_without_id_is_rejected() {
        let result = GatewayPayment::from_raw(json!({ "status": "captured" }));

        assert!(
            matches!(result, Err(GatewayError::UnexpectedResponse(_))),
            "expected UnexpectedResponse, got {result:?}"
        );
    }

    #[test]
    fn notes_serialize_in_camel_case() -> TestResult {
        let notes = serde_json::to_value(GatewayOrderNotes {
            order_id: "o".to_string(),
            user_id: "u".to_string(),
        })?;

        assert_eq!(notes, json!({ "orderId": "o", "userId": "u" }));

        Ok(())
    }
}
