//! Promo Codes
//!
//! Evaluation is pure: the caller supplies the order subtotal and the
//! evaluation instant, and gets back either a bounded discount or the first
//! rule the code failed.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::round_paise;

/// How a promo's `amount` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// `amount` percent of the subtotal.
    Percent,

    /// `amount` rupees off.
    Fixed,
}

impl DiscountType {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown discount type name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid discount type: {0}")]
pub struct InvalidDiscountType(pub String);

impl FromStr for DiscountType {
    type Err = InvalidDiscountType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "percent" => Ok(Self::Percent),
            "fixed" => Ok(Self::Fixed),
            other => Err(InvalidDiscountType(other.to_string())),
        }
    }
}

/// The rules a promo code is evaluated under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoTerms {
    /// Whether the code can be redeemed at all.
    pub is_active: bool,

    /// Start of the validity window.
    pub starts_at: Option<Timestamp>,

    /// End of the validity window.
    pub ends_at: Option<Timestamp>,

    /// Maximum number of redemptions.
    pub usage_limit: Option<u32>,

    /// Redemptions so far.
    pub used_count: u32,

    /// Smallest subtotal the code applies to.
    pub min_order_value: Option<Decimal>,

    /// Interpretation of `amount`.
    pub discount_type: DiscountType,

    /// Percentage or rupee amount.
    pub amount: Decimal,

    /// Upper bound on the discount.
    pub max_discount: Option<Decimal>,
}

/// Why a promo code was rejected, in evaluation order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PromoRejection {
    /// The subtotal itself is unusable.
    #[error("Invalid order total")]
    InvalidOrderTotal,

    /// The code has been switched off.
    #[error("Promo code inactive")]
    Inactive,

    /// The validity window has not opened.
    #[error("Promo code not started")]
    NotStarted,

    /// The validity window has closed.
    #[error("Promo code expired")]
    Expired,

    /// Every redemption has been used.
    #[error("Promo code usage limit reached")]
    UsageLimitReached,

    /// The subtotal is below the threshold.
    #[error("Minimum order value is {}", .minimum.normalize())]
    MinimumOrderValue {
        /// The threshold.
        minimum: Decimal,
    },
}

impl PromoRejection {
    /// Machine-readable reason code.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidOrderTotal => "invalid_order_total",
            Self::Inactive => "inactive",
            Self::NotStarted => "not_started",
            Self::Expired => "expired",
            Self::UsageLimitReached => "usage_limit_reached",
            Self::MinimumOrderValue { .. } => "minimum_order_value",
        }
    }
}

/// An accepted promo code's effect on a subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromoOutcome {
    /// Discount, within `[0, subtotal]`.
    pub discount: Decimal,

    /// Subtotal after discount.
    pub total_after: Decimal,
}

/// Normalize a promo code for storage and lookup.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Evaluate a promo against a subtotal at `now`.
///
/// # Errors
///
/// Returns the first [`PromoRejection`] the code fails, checked in the order:
/// subtotal, active, start, end, usage, minimum order value.
pub fn evaluate(
    terms: &PromoTerms,
    subtotal: Decimal,
    now: Timestamp,
) -> Result<PromoOutcome, PromoRejection> {
    if subtotal < Decimal::ZERO {
        return Err(PromoRejection::InvalidOrderTotal);
    }

    if !terms.is_active {
        return Err(PromoRejection::Inactive);
    }

    if terms.starts_at.is_some_and(|starts_at| now < starts_at) {
        return Err(PromoRejection::NotStarted);
    }

    if terms.ends_at.is_some_and(|ends_at| now > ends_at) {
        return Err(PromoRejection::Expired);
    }

    if terms
        .usage_limit
        .is_some_and(|limit| terms.used_count >= limit)
    {
        return Err(PromoRejection::UsageLimitReached);
    }

    if let Some(minimum) = terms.min_order_value
        && subtotal < minimum
    {
        return Err(PromoRejection::MinimumOrderValue { minimum });
    }

    let raw = match terms.discount_type {
        DiscountType::Percent => subtotal
            .checked_mul(terms.amount)
            .map_or(Decimal::ZERO, |product| product / Decimal::ONE_HUNDRED),
        DiscountType::Fixed => terms.amount,
    };

    let mut discount = round_paise(raw.max(Decimal::ZERO));

    if let Some(cap) = terms.max_discount {
        discount = discount.min(cap.max(Decimal::ZERO));
    }

    discount = discount.min(subtotal);

    Ok(PromoOutcome {
        discount,
        total_after: subtotal - discount,
    })
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use testresult::TestResult;

    use super::*;

    fn terms(discount_type: DiscountType, amount: i64) -> PromoTerms {
        PromoTerms {
            is_active: true,
            starts_at: None,
            ends_at: None,
            usage_limit: None,
            used_count: 0,
            min_order_value: None,
            discount_type,
            amount: Decimal::from(amount),
            max_discount: None,
        }
    }

    #[test]
    fn fixed_discount_with_minimum_met() -> TestResult {
        let promo = PromoTerms {
            min_order_value: Some(Decimal::from(1000)),
            ..terms(DiscountType::Fixed, 300)
        };

        let outcome = evaluate(&promo, Decimal::from(2000), Timestamp::now())?;

        assert_eq!(outcome.discount, Decimal::from(300));
        assert_eq!(outcome.total_after, Decimal::from(1700));

        Ok(())
    }

    #[test]
    fn percent_discount_is_capped_at_subtotal() -> TestResult {
        let outcome = evaluate(
            &terms(DiscountType::Percent, 150),
            Decimal::from(1000),
            Timestamp::now(),
        )?;

        assert_eq!(outcome.discount, Decimal::from(1000));
        assert_eq!(outcome.total_after, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn max_discount_caps_percent() -> TestResult {
        let promo = PromoTerms {
            max_discount: Some(Decimal::from(250)),
            ..terms(DiscountType::Percent, 10)
        };

        let outcome = evaluate(&promo, Decimal::from(5000), Timestamp::now())?;

        assert_eq!(outcome.discount, Decimal::from(250));

        Ok(())
    }

    #[test]
    fn negative_amount_floors_at_zero() -> TestResult {
        let outcome = evaluate(
            &terms(DiscountType::Fixed, -50),
            Decimal::from(500),
            Timestamp::now(),
        )?;

        assert_eq!(outcome.discount, Decimal::ZERO);
        assert_eq!(outcome.total_after, Decimal::from(500));

        Ok(())
    }

    #[test]
    fn minimum_order_value_message_includes_threshold() {
        let promo = PromoTerms {
            min_order_value: Some(Decimal::new(5000_00, 2)),
            ..terms(DiscountType::Fixed, 300)
        };

        let rejection = evaluate(&promo, Decimal::from(2000), Timestamp::now());

        assert_eq!(
            rejection.as_ref().map_err(ToString::to_string),
            Err("Minimum order value is 5000".to_string())
        );
        assert_eq!(
            rejection.err().map(|r| r.reason()),
            Some("minimum_order_value")
        );
    }

    #[test]
    fn checks_short_circuit_in_order() -> TestResult {
        let now = Timestamp::now();
        let past = now.checked_sub(SignedDuration::from_hours(24))?;
        let future = now.checked_add(SignedDuration::from_hours(24))?;

        // Inactive wins over every later failure.
        let everything_wrong = PromoTerms {
            is_active: false,
            starts_at: Some(future),
            ends_at: Some(past),
            usage_limit: Some(1),
            used_count: 1,
            min_order_value: Some(Decimal::from(10_000)),
            ..terms(DiscountType::Fixed, 100)
        };

        assert_eq!(
            evaluate(&everything_wrong, Decimal::from(100), now),
            Err(PromoRejection::Inactive)
        );

        let not_started = PromoTerms {
            is_active: true,
            ..everything_wrong.clone()
        };

        assert_eq!(
            evaluate(&not_started, Decimal::from(100), now),
            Err(PromoRejection::NotStarted)
        );

        let expired = PromoTerms {
            starts_at: None,
            ..not_started
        };

        assert_eq!(
            evaluate(&expired, Decimal::from(100), now),
            Err(PromoRejection::Expired)
        );

        let exhausted = PromoTerms {
            ends_at: None,
            ..expired
        };

        assert_eq!(
            evaluate(&exhausted, Decimal::from(100), now),
            Err(PromoRejection::UsageLimitReached)
        );

        Ok(())
    }

    #[test]
    fn negative_subtotal_is_rejected() {
        assert_eq!(
            evaluate(&terms(DiscountType::Fixed, 1), Decimal::from(-1), Timestamp::now()),
            Err(PromoRejection::InvalidOrderTotal)
        );
    }

    #[test]
    fn discount_type_parses_case_insensitively() {
        assert_eq!("Percent".parse::<DiscountType>(), Ok(DiscountType::Percent));
        assert_eq!(
            "bogo".parse::<DiscountType>(),
            Err(InvalidDiscountType("bogo".to_string()))
        );
    }

    #[test]
    fn normalize_code_trims_and_uppercases() {
        assert_eq!(normalize_code("  diwali10 "), "DIWALI10");
    }
}
