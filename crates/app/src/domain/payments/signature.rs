//! Checkout callback signatures.
//!
//! Razorpay signs `"{order_id}|{payment_id}"` with HMAC-SHA256 under the key secret and sends
//! the lowercase hex digest.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Hex digest the gateway is expected to send for this pair.
#[must_use]
pub fn expected_signature(secret: &[u8], order_id: &str, payment_id: &str) -> String {
    // HMAC accepts keys of any length.
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return String::new();
    };

    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());

    hex::encode(mac.finalize().into_bytes())
}

/// Compare a received signature with the expected one without leaking where they differ.
#[must_use]
pub fn signature_matches(secret: &[u8], order_id: &str, payment_id: &str, signature: &str) -> bool {
    let expected = expected_signature(secret, order_id, payment_id);

    !expected.is_empty() && bool::from(expected.as_bytes().ct_eq(signature.trim().as_bytes()))
}
