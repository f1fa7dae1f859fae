//! Razorpay Orders and Payments API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use zeroize::Zeroizing;

use crate::domain::payments::{
    gateway::{GatewayError, GatewayOrder, GatewayOrderRequest, GatewayPayment, PaymentGateway},
    signature::signature_matches,
};

/// Default Razorpay REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.razorpay.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Credentials for a Razorpay account.
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: Zeroizing<String>,

    /// REST endpoint, e.g. `"https://api.razorpay.com/v1"`.
    pub api_base: String,
}

/// HTTP client for the Razorpay API.
#[derive(Debug, Clone)]
pub struct RazorpayClient {
    config: RazorpayConfig,
    http: Client,
}

impl RazorpayClient {
    /// Create a client with bounded request and connect timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: RazorpayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.api_base.trim_end_matches('/'))
    }

    async fn read_body(response: Response, operation: &str) -> Result<Value, GatewayError> {
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(GatewayError::UnexpectedResponse(format!(
                "{operation} failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    fn key_id(&self) -> String {
        self.config.key_id.clone()
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        signature_matches(
            self.config.key_secret.as_bytes(),
            order_id,
            payment_id,
            signature,
        )
    }

    async fn create_order(
        &self,
        request: GatewayOrderRequest,
    ) -> Result<GatewayOrder, GatewayError> {
        let response = self
            .http
            .post(self.url("orders"))
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.as_str()))
            .json(&request)
            .send()
            .await?;

        let raw = Self::read_body(response, "order creation").await?;

        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::UnexpectedResponse("order without id".to_string()))?
            .to_string();

        Ok(GatewayOrder { id, raw })
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<GatewayPayment, GatewayError> {
        let response = self
            .http
            .get(self.url(&format!("payments/{payment_id}")))
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.as_str()))
            .send()
            .await?;

        GatewayPayment::from_raw(Self::read_body(response, "payment fetch").await?)
    }
}
