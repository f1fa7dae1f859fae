//! Integration tests for promo evaluation feeding order totals.
//!
//! Scenario: a 2,000 subtotal with a fixed 300 promo (minimum order 1,000).
//!
//! - Discount: 300, total after discount 1,700
//! - GST at 3%: 51
//! - Total: 1,751

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use testresult::TestResult;

use karat::{
    money::{round_rupees, to_paise},
    orders::{LineItem, OrderTotals},
    promo::{DiscountType, PromoRejection, PromoTerms, evaluate},
};

fn fixed_promo(amount: i64, minimum: i64) -> PromoTerms {
    PromoTerms {
        is_active: true,
        starts_at: None,
        ends_at: None,
        usage_limit: None,
        used_count: 0,
        min_order_value: Some(Decimal::from(minimum)),
        discount_type: DiscountType::Fixed,
        amount: Decimal::from(amount),
        max_discount: None,
    }
}

fn lines() -> Vec<LineItem> {
    vec![
        LineItem {
            unit_price: Decimal::from(750),
            quantity: 2,
        },
        LineItem {
            unit_price: Decimal::from(500),
            quantity: 1,
        },
    ]
}

#[test]
fn fixed_promo_checkout_scenario() -> TestResult {
    let subtotal = OrderTotals::compute(&lines(), Decimal::ZERO)?.subtotal;
    let outcome = evaluate(&fixed_promo(300, 1000), subtotal, Timestamp::now())?;

    assert_eq!(outcome.discount, Decimal::from(300));
    assert_eq!(outcome.total_after, Decimal::from(1700));

    let totals = OrderTotals::compute(&lines(), outcome.discount)?;

    assert_eq!(totals.subtotal, Decimal::from(2000));
    assert_eq!(totals.tax, Decimal::from(51));
    assert_eq!(totals.total, Decimal::from(1751));
    assert_eq!(to_paise(totals.total)?, 175_100);

    Ok(())
}

#[test]
fn minimum_order_value_rejects_small_subtotal() {
    let rejection = evaluate(&fixed_promo(300, 5000), Decimal::from(2000), Timestamp::now());

    assert_eq!(
        rejection,
        Err(PromoRejection::MinimumOrderValue {
            minimum: Decimal::from(5000)
        })
    );
}

#[test]
fn expired_promo_is_always_rejected() -> TestResult {
    let now = Timestamp::now();
    let promo = PromoTerms {
        ends_at: Some(now.checked_sub(SignedDuration::from_secs(1))?),
        min_order_value: None,
        ..fixed_promo(100, 0)
    };

    for subtotal in [0, 1, 999, 1_000_000] {
        assert_eq!(
            evaluate(&promo, Decimal::from(subtotal), now),
            Err(PromoRejection::Expired)
        );
    }

    Ok(())
}

#[test]
fn total_matches_discounted_subtotal_plus_gst() -> TestResult {
    let gst = Decimal::new(103, 2);

    for discount in [-100, 0, 1, 299, 1999, 2000, 5000] {
        let totals = OrderTotals::compute(&lines(), Decimal::from(discount))?;

        assert!(totals.discount >= Decimal::ZERO);
        assert!(totals.discount <= totals.subtotal);
        assert_eq!(
            totals.total,
            round_rupees((totals.subtotal - totals.discount) * gst),
            "discount {discount}"
        );
    }

    Ok(())
}
