//! Promo Code Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;
pub(crate) mod validate;

#[cfg(test)]
pub(crate) mod fixtures {
    use jiff::Timestamp;
    use karat::promo::DiscountType;
    use karat_app::domain::promocodes::models::{PromoCode, PromoCodeUuid};
    use rust_decimal::Decimal;

    /// An active, unlimited fixed-amount code.
    pub(crate) fn fixed_promo(uuid: PromoCodeUuid, code: &str, amount: i64) -> PromoCode {
        PromoCode {
            uuid,
            code: code.to_string(),
            description: String::new(),
            discount_type: DiscountType::Fixed,
            amount: Decimal::from(amount),
            max_discount: None,
            min_order_value: None,
            starts_at: None,
            ends_at: None,
            usage_limit: None,
            used_count: 0,
            is_active: true,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }
}
