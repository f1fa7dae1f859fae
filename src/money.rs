//! Money
//!
//! Rupee amounts are carried as [`Decimal`] and rounded to whole rupees wherever
//! a customer sees them. Gateways receive paise.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso};
use serde_json::Value;
use thiserror::Error;

/// Errors converting rupees into minor units.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MinorUnitsError {
    /// The amount does not fit in an `i64` count of paise.
    #[error("amount is too large to express in minor units")]
    Overflow,
}

/// Round to the nearest whole rupee, halves away from zero.
#[must_use]
pub fn round_rupees(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to the nearest paisa, halves away from zero.
#[must_use]
pub fn round_paise(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a rupee amount to paise. Negative amounts clamp to zero.
///
/// # Errors
///
/// Returns [`MinorUnitsError::Overflow`] when the result does not fit in an `i64`.
pub fn to_paise(amount: Decimal) -> Result<i64, MinorUnitsError> {
    let paise = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(MinorUnitsError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    paise
        .max(Decimal::ZERO)
        .to_i64()
        .ok_or(MinorUnitsError::Overflow)
}

/// Format a rupee amount for notification text, e.g. `₹30,600.00`.
#[must_use]
pub fn format_inr(amount: Decimal) -> String {
    Money::from_decimal(amount, iso::INR).to_string()
}

/// Read a loosely typed JSON attribute as an amount.
///
/// JSON numbers and numeric strings are accepted; anything else is absent.
#[must_use]
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .map(Decimal::from)
            .or_else(|| number.as_u64().map(Decimal::from))
            .or_else(|| number.as_f64().and_then(Decimal::from_f64)),
        Value::String(text) => text.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

/// Render an amount as a JSON number.
#[must_use]
pub fn decimal_to_json(amount: Decimal) -> Value {
    let normalized = amount.normalize();

    if normalized.scale() == 0
        && let Some(whole) = normalized.to_i64()
    {
        return Value::from(whole);
    }

    normalized
        .to_f64()
        .and_then(serde_json::Number::from_f64)
        .map_or(Value::Null, Value::Number)
}
