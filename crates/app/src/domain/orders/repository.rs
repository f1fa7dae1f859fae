//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use karat::orders::{Delivery, OrderStatus};
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar, types::Json,
};

use crate::{
    domain::{
        orders::models::{Order, OrderItem, OrderUuid, ShippingAddress},
        payments::models::PaymentUuid,
        users::models::UserUuid,
    },
    pagination::PageRequest,
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_USER_ORDER_SQL: &str = include_str!("sql/get_user_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const LOCK_USER_ORDER_SQL: &str = include_str!("sql/lock_user_order.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("sql/list_user_orders.sql");
const COUNT_USER_ORDERS_SQL: &str = include_str!("sql/count_user_orders.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("sql/count_orders.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");
const UPDATE_ORDER_DELIVERY_SQL: &str = include_str!("sql/update_order_delivery.sql");
const SET_ORDER_PAYMENT_SQL: &str = include_str!("sql/set_order_payment.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid)
            .bind(order.user)
            .bind(Json(&order.items))
            .bind(order.subtotal)
            .bind(order.discount)
            .bind(order.tax)
            .bind(order.total)
            .bind(order.status.as_str())
            .bind(order.promocode)
            .bind(order.customer_email.as_deref())
            .bind(order.customer_phone.as_deref())
            .bind(order.shipping_address.as_ref().map(Json))
            .bind(order.notes.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order)
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch an order only if it belongs to `user`.
    pub(crate) async fn get_user_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        user: UserUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_USER_ORDER_SQL)
            .bind(order)
            .bind(user)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(LOCK_ORDER_SQL)
            .bind(order)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_user_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        user: UserUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(LOCK_USER_ORDER_SQL)
            .bind(order)
            .bind(user)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        page: PageRequest,
    ) -> Result<(Vec<Order>, i64), sqlx::Error> {
        let orders = query_as::<Postgres, Order>(LIST_USER_ORDERS_SQL)
            .bind(user)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut **tx)
            .await?;

        let total: i64 = query_scalar(COUNT_USER_ORDERS_SQL)
            .bind(user)
            .fetch_one(&mut **tx)
            .await?;

        Ok((orders, total))
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        page: PageRequest,
    ) -> Result<(Vec<Order>, i64), sqlx::Error> {
        let orders = query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut **tx)
            .await?;

        let total: i64 = query_scalar(COUNT_ORDERS_SQL)
            .fetch_one(&mut **tx)
            .await?;

        Ok((orders, total))
    }

    pub(crate) async fn update_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_ORDER_STATUS_SQL)
            .bind(order)
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_order_delivery(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        delivery: &Delivery,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_ORDER_DELIVERY_SQL)
            .bind(order)
            .bind(Json(delivery))
            .fetch_one(&mut **tx)
            .await
    }

    /// Point the order at its latest payment.
    pub(crate) async fn set_order_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        payment: PaymentUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(SET_ORDER_PAYMENT_SQL)
            .bind(order)
            .bind(payment)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(items) = row.try_get::<Json<Vec<OrderItem>>, _>("items")?;
        let status: String = row.try_get("status")?;
        let shipping_address = row
            .try_get::<Option<Json<ShippingAddress>>, _>("shipping_address")?
            .map(|Json(address)| address);
        let delivery = row
            .try_get::<Option<Json<Delivery>>, _>("delivery")?
            .map(|Json(delivery)| delivery);

        Ok(Self {
            uuid: row.try_get("uuid")?,
            user: row.try_get("user_uuid")?,
            items,
            subtotal: row.try_get("subtotal")?,
            discount: row.try_get("discount")?,
            tax: row.try_get("tax")?,
            total: row.try_get("total")?,
            status: status
                .parse::<OrderStatus>()
                .map_err(|error| sqlx::Error::Decode(Box::new(error)))?,
            promocode: row.try_get("promocode_uuid")?,
            payment: row.try_get("payment_uuid")?,
            customer_email: row.try_get("customer_email")?,
            customer_phone: row.try_get("customer_phone")?,
            shipping_address,
            notes: row.try_get("notes")?,
            delivery,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
