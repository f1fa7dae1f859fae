//! Payments Config

use clap::Args;
use karat_app::domain::payments::{RazorpayConfig, razorpay::DEFAULT_API_BASE};
use zeroize::Zeroizing;

/// Razorpay settings. Checkout is disabled unless both keys are set.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Razorpay key id
    #[arg(long, env = "RAZORPAY_KEY_ID")]
    pub razorpay_key_id: Option<String>,

    /// Razorpay key secret
    #[arg(long, env = "RAZORPAY_KEY_SECRET", hide_env_values = true)]
    pub razorpay_key_secret: Option<String>,

    /// Razorpay REST endpoint
    #[arg(long, env = "RAZORPAY_API_BASE", default_value = DEFAULT_API_BASE)]
    pub razorpay_api_base: String,
}

impl PaymentsConfig {
    /// Client settings, when both keys are present and non-empty.
    #[must_use]
    pub fn razorpay(&self) -> Option<RazorpayConfig> {
        let key_id = self
            .razorpay_key_id
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())?;

        let key_secret = self
            .razorpay_key_secret
            .as_deref()
            .map(str::trim)
            .filter(|secret| !secret.is_empty())?;

        Some(RazorpayConfig {
            key_id: key_id.to_string(),
            key_secret: Zeroizing::new(key_secret.to_string()),
            api_base: self.razorpay_api_base.clone(),
        })
    }
}
