//! Orders service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use karat::{
    orders::{DeliveryPatch, LineItem, OrderStatus, OrderTotals, StatusChange},
    promo::{PromoRejection, evaluate},
};
use mockall::automock;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        orders::{
            errors::OrdersServiceError,
            models::{FALLBACK_ITEM_NAME, NewOrder, Order, OrderItem, OrderUuid, trimmed},
            repository::PgOrdersRepository,
        },
        products::{
            models::{Product, ProductUuid},
            repository::PgProductsRepository,
        },
        promocodes::repository::PgPromoCodesRepository,
        users::{models::UserUuid, repository::PgUsersRepository},
    },
    notifications::{NotificationEvent, Notifier},
    pagination::{Page, PageRequest},
};

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    products: PgProductsRepository,
    promocodes: PgPromoCodesRepository,
    users: PgUsersRepository,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgOrdersService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            products: PgProductsRepository::new(),
            promocodes: PgPromoCodesRepository::new(),
            users: PgUsersRepository::new(),
            notifier,
        }
    }
}

/// Validate client lines against the catalog and snapshot them.
fn snapshot_items(
    order: &NewOrder,
    catalog: &FxHashMap<ProductUuid, Product>,
) -> Result<Vec<OrderItem>, OrdersServiceError> {
    if order.items.is_empty() {
        return Err(OrdersServiceError::MissingItems);
    }

    order
        .items
        .iter()
        .map(|item| {
            if item.quantity < 1 || item.price < Decimal::ZERO {
                return Err(OrdersServiceError::InvalidItems);
            }

            let product = catalog
                .get(&item.product)
                .ok_or(OrdersServiceError::InvalidItems)?;

            let name = trimmed(item.name.clone())
                .or_else(|| trimmed(Some(product.name.clone())))
                .unwrap_or_else(|| FALLBACK_ITEM_NAME.to_string());

            Ok(OrderItem {
                product: item.product,
                name,
                price: item.price,
                quantity: item.quantity,
                image: trimmed(item.image.clone()),
            })
        })
        .collect()
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[instrument(skip(self, order), fields(order_uuid = %order.uuid))]
    async fn create_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError> {
        if order.items.is_empty() {
            return Err(OrdersServiceError::MissingItems);
        }

        let now = Timestamp::now();
        let mut tx = self.db.begin().await?;

        let customer = self.users.get_user(&mut tx, user).await?;

        let product_uuids: Vec<Uuid> = order
            .items
            .iter()
            .map(|item| item.product.into_uuid())
            .collect();

        let catalog: FxHashMap<ProductUuid, Product> = self
            .products
            .get_products(&mut tx, &product_uuids)
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        let items = snapshot_items(&order, &catalog)?;
        let lines: Vec<LineItem> = items.iter().map(OrderItem::line).collect();
        let mut totals = OrderTotals::compute(&lines, Decimal::ZERO)?;

        if let Some(promocode) = order.promocode {
            let promo = self
                .promocodes
                .lock_promocode(&mut tx, promocode)
                .await
                .map_err(|error| match error {
                    sqlx::Error::RowNotFound => OrdersServiceError::PromoNotFound,
                    other => OrdersServiceError::from(other),
                })?;

            let outcome = evaluate(&promo.terms(), totals.subtotal, now)?;

            self.promocodes
                .redeem_promocode(&mut tx, promocode)
                .await?
                .ok_or(PromoRejection::UsageLimitReached)?;

            totals = OrderTotals::compute(&lines, outcome.discount)?;
        }

        let draft = Order {
            uuid: order.uuid,
            user,
            items,
            subtotal: totals.subtotal,
            discount: totals.discount,
            tax: totals.tax,
            total: totals.total,
            status: OrderStatus::Pending,
            promocode: order.promocode,
            payment: None,
            customer_email: trimmed(order.customer_email).map(|email| email.to_lowercase()),
            customer_phone: trimmed(order.customer_phone),
            shipping_address: order.shipping_address,
            notes: trimmed(order.notes),
            delivery: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.create_order(&mut tx, &draft).await?;

        tx.commit().await?;

        info!(total = %created.total, "order created");

        self.notifier.emit(NotificationEvent::OrderPlaced {
            order: Box::new(created.clone()),
            customer: Box::new(customer),
        });

        Ok(created)
    }

    async fn list_orders(
        &self,
        user: UserUuid,
        page: PageRequest,
    ) -> Result<Page<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let (orders, total) = self.repository.list_user_orders(&mut tx, user, page).await?;

        tx.commit().await?;

        Ok(Page::new(orders, total, page))
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.repository.get_user_order(&mut tx, order, user).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_all_orders(&self, page: PageRequest) -> Result<Page<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let (orders, total) = self.repository.list_orders(&mut tx, page).await?;

        tx.commit().await?;

        Ok(Page::new(orders, total, page))
    }

    #[instrument(skip(self))]
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.repository.lock_order(&mut tx, order).await?;

        let StatusChange::Changed { from, to } = current.status.transition_to(status) else {
            tx.commit().await?;

            return Ok(current);
        };

        let updated = self
            .repository
            .update_order_status(&mut tx, order, to)
            .await?;

        let customer = self.users.get_user(&mut tx, updated.user).await?;

        tx.commit().await?;

        info!(%from, %to, "order status changed");

        self.notifier.emit(NotificationEvent::OrderStatusChanged {
            order: Box::new(updated.clone()),
            customer: Box::new(customer),
            from,
            to,
        });

        Ok(updated)
    }

    #[instrument(skip(self, patch))]
    async fn set_delivery(
        &self,
        order: OrderUuid,
        patch: DeliveryPatch,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.repository.lock_order(&mut tx, order).await?;

        let mut delivery = current.delivery.unwrap_or_default();
        delivery.merge(patch);

        let updated = self
            .repository
            .update_order_delivery(&mut tx, order, &delivery)
            .await?;

        tx.commit().await?;

        info!("order delivery updated");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Validate, price and persist an order in one transaction, redeeming its promo code.
    async fn create_order(&self, user: UserUuid, order: NewOrder)
    -> Result<Order, OrdersServiceError>;

    /// The user's orders, newest first.
    async fn list_orders(
        &self,
        user: UserUuid,
        page: PageRequest,
    ) -> Result<Page<Order>, OrdersServiceError>;

    /// One of the user's orders. Other users' orders are not found.
    async fn get_order(&self, user: UserUuid, order: OrderUuid)
    -> Result<Order, OrdersServiceError>;

    /// Every order, newest first.
    async fn list_all_orders(&self, page: PageRequest) -> Result<Page<Order>, OrdersServiceError>;

    /// Move an order to a new status. Requesting the current status changes nothing.
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;

    /// Merge delivery details into an order.
    async fn set_delivery(
        &self,
        order: OrderUuid,
        patch: DeliveryPatch,
    ) -> Result<Order, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use karat::orders::DeliveryStatus;
    use testresult::TestResult;

    use crate::{
        domain::{
            orders::models::NewOrderItem,
            promocodes::{
                PromoCodesService,
                models::{NewPromoCode, PromoCodeUuid},
            },
        },
        test::{
            TestContext,
            helpers::{create_product, create_user, fixed_promo, gold_ring},
        },
    };

    use super::*;

    fn line(product: ProductUuid, price: i64, quantity: u32) -> NewOrderItem {
        NewOrderItem {
            product,
            name: None,
            price: Decimal::from(price),
            quantity,
            image: None,
        }
    }

    fn new_order(items: Vec<NewOrderItem>) -> NewOrder {
        NewOrder {
            uuid: OrderUuid::new(),
            items,
            promocode: None,
            customer_email: None,
            customer_phone: None,
            shipping_address: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_order_computes_totals_and_snapshots_names() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "buyer@example.com").await?;
        let ring = create_product(&ctx, gold_ring("Snapshot Ring")).await?;

        let order = ctx
            .orders
            .create_order(
                user.uuid,
                new_order(vec![line(ring.product.uuid, 1_000, 2)]),
            )
            .await?;

        assert_eq!(order.subtotal, Decimal::from(2_000));
        assert_eq!(order.discount, Decimal::ZERO);
        assert_eq!(order.tax, Decimal::from(60));
        assert_eq!(order.total, Decimal::from(2_060));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(
            order.items.first().map(|item| item.name.as_str()),
            Some("Snapshot Ring")
        );

        Ok(())
    }

    #[tokio::test]
    async fn fixed_promo_is_applied_and_redeemed() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "promo@example.com").await?;
        let ring = create_product(&ctx, gold_ring("Promo Ring")).await?;
        let promo = ctx
            .promocodes
            .create_promocode(fixed_promo("FLAT300", 300))
            .await?;

        let order = ctx
            .orders
            .create_order(
                user.uuid,
                NewOrder {
                    promocode: Some(promo.uuid),
                    ..new_order(vec![line(ring.product.uuid, 2_000, 1)])
                },
            )
            .await?;

        assert_eq!(order.discount, Decimal::from(300));
        assert_eq!(order.tax, Decimal::from(51));
        assert_eq!(order.total, Decimal::from(1_751));

        let redeemed = ctx.promocodes.get_promocode(promo.uuid).await?;

        assert_eq!(redeemed.used_count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn rejected_promo_aborts_the_order() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "min@example.com").await?;
        let ring = create_product(&ctx, gold_ring("Min Ring")).await?;
        let promo = ctx
            .promocodes
            .create_promocode(NewPromoCode {
                min_order_value: Some(Decimal::from(5_000)),
                ..fixed_promo("BIGSPEND", 500)
            })
            .await?;

        let result = ctx
            .orders
            .create_order(
                user.uuid,
                NewOrder {
                    promocode: Some(promo.uuid),
                    ..new_order(vec![line(ring.product.uuid, 2_000, 1)])
                },
            )
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::PromoRejected(
                    PromoRejection::MinimumOrderValue { .. }
                ))
            ),
            "expected MinimumOrderValue, got {result:?}"
        );

        let page = ctx.orders.list_orders(user.uuid, PageRequest::default()).await?;
        let untouched = ctx.promocodes.get_promocode(promo.uuid).await?;

        assert_eq!(page.total, 0);
        assert_eq!(untouched.used_count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn exhausted_promo_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "limit@example.com").await?;
        let ring = create_product(&ctx, gold_ring("Limit Ring")).await?;
        let promo = ctx
            .promocodes
            .create_promocode(NewPromoCode {
                usage_limit: Some(1),
                ..fixed_promo("ONCE", 100)
            })
            .await?;

        let with_promo = || NewOrder {
            promocode: Some(promo.uuid),
            ..new_order(vec![line(ring.product.uuid, 1_000, 1)])
        };

        ctx.orders.create_order(user.uuid, with_promo()).await?;
        let second = ctx.orders.create_order(user.uuid, with_promo()).await;

        assert!(
            matches!(
                second,
                Err(OrdersServiceError::PromoRejected(
                    PromoRejection::UsageLimitReached
                ))
            ),
            "expected UsageLimitReached, got {second:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_or_promo_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "unknown@example.com").await?;
        let ring = create_product(&ctx, gold_ring("Known Ring")).await?;

        let unknown_product = ctx
            .orders
            .create_order(user.uuid, new_order(vec![line(ProductUuid::new(), 100, 1)]))
            .await;

        assert!(
            matches!(unknown_product, Err(OrdersServiceError::InvalidItems)),
            "expected InvalidItems, got {unknown_product:?}"
        );

        let unknown_promo = ctx
            .orders
            .create_order(
                user.uuid,
                NewOrder {
                    promocode: Some(PromoCodeUuid::new()),
                    ..new_order(vec![line(ring.product.uuid, 100, 1)])
                },
            )
            .await;

        assert!(
            matches!(unknown_promo, Err(OrdersServiceError::PromoNotFound)),
            "expected PromoNotFound, got {unknown_promo:?}"
        );

        let empty = ctx.orders.create_order(user.uuid, new_order(vec![])).await;

        assert!(
            matches!(empty, Err(OrdersServiceError::MissingItems)),
            "expected MissingItems, got {empty:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn oversized_prices_are_rejected_without_saving() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "overflow@example.com").await?;
        let ring = create_product(&ctx, gold_ring("Vault Ring")).await?;

        let item = NewOrderItem {
            price: Decimal::from_scientific("5e28")?,
            ..line(ring.product.uuid, 0, 2)
        };

        let result = ctx
            .orders
            .create_order(user.uuid, new_order(vec![item]))
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidItems)),
            "expected InvalidItems, got {result:?}"
        );

        let orders = ctx
            .orders
            .list_orders(user.uuid, PageRequest::default())
            .await?;

        assert_eq!(orders.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn other_users_orders_are_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = create_user(&ctx, "owner@example.com").await?;
        let other = create_user(&ctx, "other@example.com").await?;
        let ring = create_product(&ctx, gold_ring("Private Ring")).await?;

        let order = ctx
            .orders
            .create_order(owner.uuid, new_order(vec![line(ring.product.uuid, 500, 1)]))
            .await?;

        let result = ctx.orders.get_order(other.uuid, order.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let all = ctx.orders.list_all_orders(PageRequest::default()).await?;

        assert_eq!(all.total, 1);

        Ok(())
    }

    #[tokio::test]
    async fn status_accepts_any_value_and_ignores_repeats() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "status@example.com").await?;
        let ring = create_product(&ctx, gold_ring("Status Ring")).await?;

        let order = ctx
            .orders
            .create_order(user.uuid, new_order(vec![line(ring.product.uuid, 500, 1)]))
            .await?;

        let confirmed = ctx
            .orders
            .update_status(order.uuid, OrderStatus::Confirmed)
            .await?;

        assert_eq!(confirmed.status, OrderStatus::Confirmed);

        let same = ctx
            .orders
            .update_status(order.uuid, OrderStatus::Confirmed)
            .await?;

        assert_eq!(same.updated_at, confirmed.updated_at);

        let processing = ctx
            .orders
            .update_status(order.uuid, OrderStatus::Processing)
            .await?;

        assert_eq!(processing.status, OrderStatus::Processing);

        let delivered = ctx
            .orders
            .update_status(order.uuid, OrderStatus::Delivered)
            .await?;
        let reopened = ctx
            .orders
            .update_status(order.uuid, OrderStatus::Pending)
            .await?;

        assert_eq!(delivered.status, OrderStatus::Delivered);
        assert_eq!(reopened.status, OrderStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn delivery_patches_merge() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "delivery@example.com").await?;
        let ring = create_product(&ctx, gold_ring("Courier Ring")).await?;

        let order = ctx
            .orders
            .create_order(user.uuid, new_order(vec![line(ring.product.uuid, 500, 1)]))
            .await?;

        ctx.orders
            .set_delivery(
                order.uuid,
                DeliveryPatch {
                    provider: Some("BlueDart".to_string()),
                    tracking_id: Some("BD123".to_string()),
                    ..DeliveryPatch::default()
                },
            )
            .await?;

        let updated = ctx
            .orders
            .set_delivery(
                order.uuid,
                DeliveryPatch {
                    status: Some(DeliveryStatus::InTransit),
                    shipped_at: Some("not a date".to_string()),
                    ..DeliveryPatch::default()
                },
            )
            .await?;

        let delivery = updated.delivery.unwrap_or_default();

        assert_eq!(delivery.provider.as_deref(), Some("BlueDart"));
        assert_eq!(delivery.tracking_id.as_deref(), Some("BD123"));
        assert_eq!(delivery.status, Some(DeliveryStatus::InTransit));
        assert_eq!(delivery.shipped_at, None);

        Ok(())
    }
}
