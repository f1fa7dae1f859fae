//! Payments service.
//!
//! Checkouts are opened against the gateway and recorded as `created` payments linked to their
//! order. Callbacks are verified by signature and then reconciled against the provider's view
//! of the payment. A refused callback is still persisted as `failed` before the error returns.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use karat::{money::to_paise, orders::OrderStatus};
use mockall::automock;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::{
    database::Db,
    domain::{
        orders::{models::OrderUuid, repository::PgOrdersRepository},
        payments::{
            errors::PaymentsServiceError,
            gateway::{GatewayOrderNotes, GatewayOrderRequest, PaymentGateway},
            models::{
                CURRENCY, DEFAULT_METHOD, NewPayment, Payment, PaymentStatus, PaymentUuid,
                RAZORPAY_ORDER_ID_KEY, RAZORPAY_ORDER_KEY, RAZORPAY_PROVIDER, RazorpayCallback,
                RazorpayCheckout, VerificationFailure,
            },
            repository::PgPaymentsRepository,
        },
        users::{models::UserUuid, repository::PgUsersRepository},
    },
    notifications::{NotificationEvent, Notifier},
};

#[derive(Clone)]
pub struct PgPaymentsService {
    db: Db,
    repository: PgPaymentsRepository,
    orders: PgOrdersRepository,
    users: PgUsersRepository,
    gateway: Option<Arc<dyn PaymentGateway>>,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for PgPaymentsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgPaymentsService")
            .field("db", &self.db)
            .field("gateway_configured", &self.gateway.is_some())
            .finish_non_exhaustive()
    }
}

impl PgPaymentsService {
    /// Without a gateway every checkout and verification reports [`PaymentsServiceError::NotConfigured`].
    #[must_use]
    pub fn new(
        db: Db,
        gateway: Option<Arc<dyn PaymentGateway>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            db,
            repository: PgPaymentsRepository::new(),
            orders: PgOrdersRepository::new(),
            users: PgUsersRepository::new(),
            gateway,
            notifier,
        }
    }

    fn gateway(&self) -> Result<&Arc<dyn PaymentGateway>, PaymentsServiceError> {
        self.gateway
            .as_ref()
            .ok_or(PaymentsServiceError::NotConfigured)
    }
}

fn order_not_found(error: sqlx::Error) -> PaymentsServiceError {
    match error {
        sqlx::Error::RowNotFound => PaymentsServiceError::OrderNotFound,
        other => PaymentsServiceError::from(other),
    }
}

fn checkout_method(method: Option<String>) -> String {
    method
        .map(|method| method.trim().to_lowercase())
        .filter(|method| !method.is_empty())
        .unwrap_or_else(|| DEFAULT_METHOD.to_string())
}

#[async_trait]
impl PaymentsService for PgPaymentsService {
    #[instrument(skip(self, method))]
    async fn create_razorpay_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
        method: Option<String>,
    ) -> Result<RazorpayCheckout, PaymentsServiceError> {
        let gateway = self.gateway()?;

        let mut tx = self.db.begin().await?;

        let order = self
            .orders
            .lock_user_order(&mut tx, order, user)
            .await
            .map_err(order_not_found)?;

        if let Some(existing) = order.payment {
            match self
                .repository
                .lock_order_payment(&mut tx, existing, order.uuid, user)
                .await
            {
                Ok(payment) => {
                    if let Some(razorpay_order) = payment.razorpay_order().cloned() {
                        tx.commit().await?;

                        return Ok(RazorpayCheckout {
                            key_id: gateway.key_id(),
                            razorpay_order,
                            payment: payment.uuid,
                            created: false,
                        });
                    }
                }
                Err(sqlx::Error::RowNotFound) => {}
                Err(error) => return Err(error.into()),
            }
        }

        let amount = to_paise(order.total).map_err(|_| PaymentsServiceError::InvalidAmount)?;

        let gateway_order = gateway
            .create_order(GatewayOrderRequest {
                amount,
                currency: CURRENCY.to_string(),
                receipt: order.uuid.to_string(),
                notes: GatewayOrderNotes {
                    order_id: order.uuid.to_string(),
                    user_id: user.to_string(),
                },
            })
            .await?;

        let mut meta = Map::new();
        meta.insert(
            RAZORPAY_ORDER_ID_KEY.to_string(),
            Value::String(gateway_order.id.clone()),
        );
        meta.insert(RAZORPAY_ORDER_KEY.to_string(), gateway_order.raw.clone());

        let payment = self
            .repository
            .create_payment(
                &mut tx,
                &NewPayment {
                    uuid: PaymentUuid::new(),
                    order: order.uuid,
                    user,
                    provider: RAZORPAY_PROVIDER.to_string(),
                    method: checkout_method(method),
                    amount: order.total,
                    currency: CURRENCY.to_string(),
                    status: PaymentStatus::Created,
                    meta,
                },
            )
            .await?;

        self.orders
            .set_order_payment(&mut tx, order.uuid, payment.uuid)
            .await?;

        tx.commit().await?;

        info!(payment_uuid = %payment.uuid, gateway_order = %gateway_order.id, amount, "checkout created");

        Ok(RazorpayCheckout {
            key_id: gateway.key_id(),
            razorpay_order: gateway_order.raw,
            payment: payment.uuid,
            created: true,
        })
    }

    #[instrument(skip(self, callback), fields(order_uuid = %callback.order))]
    async fn verify_razorpay(
        &self,
        user: UserUuid,
        callback: RazorpayCallback,
    ) -> Result<Payment, PaymentsServiceError> {
        let gateway = self.gateway()?;

        if !callback.is_complete() {
            return Err(PaymentsServiceError::MissingFields);
        }

        let mut tx = self.db.begin().await?;

        let order = self
            .orders
            .lock_user_order(&mut tx, callback.order, user)
            .await
            .map_err(order_not_found)?;

        let payment_uuid = order.payment.ok_or(PaymentsServiceError::NoPayment)?;

        let payment = self
            .repository
            .lock_order_payment(&mut tx, payment_uuid, order.uuid, user)
            .await?;

        if payment.provider != RAZORPAY_PROVIDER {
            return Err(PaymentsServiceError::ProviderMismatch);
        }

        let mut meta = payment.meta.clone();
        for (key, value) in [
            ("razorpay_order_id", &callback.razorpay_order_id),
            ("razorpay_payment_id", &callback.razorpay_payment_id),
            ("razorpay_signature", &callback.razorpay_signature),
        ] {
            meta.insert(key.to_string(), Value::String(value.clone()));
        }

        let mut failure = None;
        let mut provider_payment = None;

        if gateway.verify_signature(
            &callback.razorpay_order_id,
            &callback.razorpay_payment_id,
            &callback.razorpay_signature,
        ) {
            let fetched = gateway.fetch_payment(&callback.razorpay_payment_id).await?;
            let expected_amount =
                to_paise(order.total).map_err(|_| PaymentsServiceError::InvalidAmount)?;

            if fetched
                .order_id
                .as_deref()
                .is_some_and(|order_id| order_id != callback.razorpay_order_id)
            {
                failure = Some(VerificationFailure::OrderIdMismatch);
            } else if fetched
                .amount
                .is_some_and(|amount| amount != expected_amount)
            {
                failure = Some(VerificationFailure::AmountMismatch);
            }

            provider_payment = Some(fetched);
        } else {
            failure = Some(VerificationFailure::InvalidSignature);
        }

        if let Some(failure) = failure {
            meta.insert(
                "reason".to_string(),
                Value::String(failure.reason().to_string()),
            );

            self.repository
                .update_payment(
                    &mut tx,
                    payment.uuid,
                    PaymentStatus::Failed,
                    payment.transaction_id.as_deref(),
                    &meta,
                )
                .await?;

            tx.commit().await?;

            warn!(payment_uuid = %payment.uuid, reason = failure.reason(), "payment verification failed");

            return Err(PaymentsServiceError::VerificationFailed(failure));
        }

        let status = PaymentStatus::settled(
            provider_payment
                .as_ref()
                .and_then(|fetched| fetched.status.as_deref()),
        );

        if let Some(fetched) = provider_payment {
            meta.insert("razorpay_payment".to_string(), fetched.raw);
        }

        let updated = self
            .repository
            .update_payment(
                &mut tx,
                payment.uuid,
                status,
                Some(callback.razorpay_payment_id.as_str()),
                &meta,
            )
            .await?;

        let confirmed = if order.status == OrderStatus::Pending {
            let confirmed = self
                .orders
                .update_order_status(&mut tx, order.uuid, OrderStatus::Confirmed)
                .await?;
            let customer = self.users.get_user(&mut tx, user).await?;

            Some((confirmed, customer))
        } else {
            None
        };

        tx.commit().await?;

        info!(payment_uuid = %updated.uuid, %status, "payment verified");

        if let Some((order, customer)) = confirmed {
            self.notifier.emit(NotificationEvent::OrderStatusChanged {
                order: Box::new(order),
                customer: Box::new(customer),
                from: OrderStatus::Pending,
                to: OrderStatus::Confirmed,
            });
        }

        Ok(updated)
    }

    async fn get_payment(
        &self,
        user: UserUuid,
        payment: PaymentUuid,
    ) -> Result<Payment, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let payment = self
            .repository
            .get_user_payment(&mut tx, payment, user)
            .await?;

        tx.commit().await?;

        Ok(payment)
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Open a gateway checkout for the user's order, or return the one already opened.
    async fn create_razorpay_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
        method: Option<String>,
    ) -> Result<RazorpayCheckout, PaymentsServiceError>;

    /// Reconcile a checkout callback. A pending order is confirmed on success.
    async fn verify_razorpay(
        &self,
        user: UserUuid,
        callback: RazorpayCallback,
    ) -> Result<Payment, PaymentsServiceError>;

    async fn get_payment(
        &self,
        user: UserUuid,
        payment: PaymentUuid,
    ) -> Result<Payment, PaymentsServiceError>;
}
