//! Payment Handlers

pub(crate) mod get;
pub(crate) mod razorpay_order;
pub(crate) mod razorpay_verify;

#[cfg(test)]
pub(crate) mod fixtures {
    use jiff::Timestamp;
    use karat_app::domain::{
        orders::models::OrderUuid,
        payments::models::{
            CURRENCY, DEFAULT_METHOD, Payment, PaymentStatus, PaymentUuid, RAZORPAY_PROVIDER,
        },
    };
    use rust_decimal::Decimal;
    use serde_json::{Map, Value};

    use crate::test_helpers::TEST_USER_UUID;

    /// A 2060 rupee Razorpay payment in `status`.
    pub(crate) fn razorpay_payment(
        uuid: PaymentUuid,
        order: OrderUuid,
        status: PaymentStatus,
    ) -> Payment {
        let mut meta = Map::new();
        meta.insert(
            "razorpay_order_id".to_string(),
            Value::String("order_rzp1".to_string()),
        );

        Payment {
            uuid,
            order,
            user: TEST_USER_UUID,
            provider: RAZORPAY_PROVIDER.to_string(),
            method: DEFAULT_METHOD.to_string(),
            amount: Decimal::from(2060),
            currency: CURRENCY.to_string(),
            status,
            transaction_id: None,
            meta,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }
}
