//! Payments Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use serde_json::{Map, Value};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, types::Json};

use crate::domain::{
    orders::models::OrderUuid,
    payments::models::{NewPayment, Payment, PaymentStatus, PaymentUuid},
    users::models::UserUuid,
};

const CREATE_PAYMENT_SQL: &str = include_str!("sql/create_payment.sql");
const GET_USER_PAYMENT_SQL: &str = include_str!("sql/get_user_payment.sql");
const LOCK_ORDER_PAYMENT_SQL: &str = include_str!("sql/lock_order_payment.sql");
const UPDATE_PAYMENT_SQL: &str = include_str!("sql/update_payment.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentsRepository;

impl PgPaymentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: &NewPayment,
    ) -> Result<Payment, sqlx::Error> {
        query_as::<Postgres, Payment>(CREATE_PAYMENT_SQL)
            .bind(payment.uuid)
            .bind(payment.order)
            .bind(payment.user)
            .bind(&payment.provider)
            .bind(&payment.method)
            .bind(payment.amount)
            .bind(&payment.currency)
            .bind(payment.status.as_str())
            .bind(Json(&payment.meta))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_user_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: PaymentUuid,
        user: UserUuid,
    ) -> Result<Payment, sqlx::Error> {
        query_as::<Postgres, Payment>(GET_USER_PAYMENT_SQL)
            .bind(payment)
            .bind(user)
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock a payment that belongs to both `order` and `user`.
    pub(crate) async fn lock_order_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: PaymentUuid,
        order: OrderUuid,
        user: UserUuid,
    ) -> Result<Payment, sqlx::Error> {
        query_as::<Postgres, Payment>(LOCK_ORDER_PAYMENT_SQL)
            .bind(payment)
            .bind(order)
            .bind(user)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: PaymentUuid,
        status: PaymentStatus,
        transaction_id: Option<&str>,
        meta: &Map<String, Value>,
    ) -> Result<Payment, sqlx::Error> {
        query_as::<Postgres, Payment>(UPDATE_PAYMENT_SQL)
            .bind(payment)
            .bind(status.as_str())
            .bind(transaction_id)
            .bind(Json(meta))
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Payment {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let Json(meta) = row.try_get::<Json<Map<String, Value>>, _>("meta")?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            order: row.try_get("order_uuid")?,
            user: row.try_get("user_uuid")?,
            provider: row.try_get("provider")?,
            method: row.try_get("method")?,
            amount: row.try_get("amount")?,
            currency: row.try_get("currency")?,
            status: status
                .parse::<PaymentStatus>()
                .map_err(|error| sqlx::Error::Decode(Box::new(error)))?,
            transaction_id: row.try_get("transaction_id")?,
            meta,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
