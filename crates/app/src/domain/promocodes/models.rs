//! Promo Code Models

use jiff::Timestamp;
use karat::promo::{DiscountType, PromoOutcome, PromoTerms};
use rust_decimal::Decimal;

use crate::uuids::TypedUuid;

/// Promo Code UUID
pub type PromoCodeUuid = TypedUuid<PromoCode>;

/// Stored promo code. `code` is always trimmed and uppercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoCode {
    pub uuid: PromoCodeUuid,
    pub code: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub amount: Decimal,
    pub max_discount: Option<Decimal>,
    pub min_order_value: Option<Decimal>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub usage_limit: Option<u32>,
    pub used_count: u32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PromoCode {
    /// The evaluation rules this code carries.
    #[must_use]
    pub fn terms(&self) -> PromoTerms {
        PromoTerms {
            is_active: self.is_active,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            usage_limit: self.usage_limit,
            used_count: self.used_count,
            min_order_value: self.min_order_value,
            discount_type: self.discount_type,
            amount: self.amount,
            max_discount: self.max_discount,
        }
    }
}

/// New Promo Code Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPromoCode {
    pub uuid: PromoCodeUuid,
    pub code: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub amount: Decimal,
    pub max_discount: Option<Decimal>,
    pub min_order_value: Option<Decimal>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub usage_limit: Option<u32>,
    pub is_active: bool,
}

/// Promo Code Update Model
///
/// `None` keeps the stored value; for nullable fields `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromoCodeUpdate {
    pub code: Option<String>,
    pub description: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub amount: Option<Decimal>,
    pub max_discount: Option<Option<Decimal>>,
    pub min_order_value: Option<Option<Decimal>>,
    pub starts_at: Option<Option<Timestamp>>,
    pub ends_at: Option<Option<Timestamp>>,
    pub usage_limit: Option<Option<u32>>,
    pub used_count: Option<u32>,
    pub is_active: Option<bool>,
}

impl PromoCodeUpdate {
    pub fn apply(self, promo: &mut PromoCode) {
        if let Some(code) = self.code {
            promo.code = code;
        }
        if let Some(description) = self.description {
            promo.description = description;
        }
        if let Some(discount_type) = self.discount_type {
            promo.discount_type = discount_type;
        }
        if let Some(amount) = self.amount {
            promo.amount = amount;
        }
        if let Some(max_discount) = self.max_discount {
            promo.max_discount = max_discount;
        }
        if let Some(min_order_value) = self.min_order_value {
            promo.min_order_value = min_order_value;
        }
        if let Some(starts_at) = self.starts_at {
            promo.starts_at = starts_at;
        }
        if let Some(ends_at) = self.ends_at {
            promo.ends_at = ends_at;
        }
        if let Some(usage_limit) = self.usage_limit {
            promo.usage_limit = usage_limit;
        }
        if let Some(used_count) = self.used_count {
            promo.used_count = used_count;
        }
        if let Some(is_active) = self.is_active {
            promo.is_active = is_active;
        }
    }
}

/// Storefront preview of a code against an order total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoValidation {
    pub promo: PromoCode,
    pub outcome: PromoOutcome,
}
