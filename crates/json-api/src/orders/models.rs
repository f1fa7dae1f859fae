//! Order request and response models.

use karat::orders::{Delivery, DeliveryPatch, DeliveryStatus, OrderStatus};
use karat_app::domain::{
    orders::models::{
        DEFAULT_COUNTRY, NewOrder, NewOrderItem, Order, OrderItem, OrderUuid, ShippingAddress,
    },
    products::models::ProductUuid,
    promocodes::models::PromoCodeUuid,
};
use rust_decimal::Decimal;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One snapshotted order line.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemResponse {
    pub product_id: Uuid,
    pub name: String,

    /// Unit price at order time
    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub price: Decimal,

    pub quantity: u32,
    pub image: Option<String>,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product.into_uuid(),
            name: item.name,
            price: item.price,
            quantity: item.quantity,
            image: item.image,
        }
    }
}

/// Shipping address.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShippingAddressBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,

    /// Defaults to `IN`
    #[serde(default)]
    pub country: Option<String>,
}

impl From<ShippingAddress> for ShippingAddressBody {
    fn from(address: ShippingAddress) -> Self {
        Self {
            name: address.name,
            phone: address.phone,
            line1: address.line1,
            line2: address.line2,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: Some(address.country),
        }
    }
}

impl From<ShippingAddressBody> for ShippingAddress {
    fn from(body: ShippingAddressBody) -> Self {
        Self {
            name: body.name,
            phone: body.phone,
            line1: body.line1,
            line2: body.line2,
            city: body.city,
            state: body.state,
            postal_code: body.postal_code,
            country: body
                .country
                .map(|country| country.trim().to_string())
                .filter(|country| !country.is_empty())
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        }
    }
}

/// Courier details of an order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeliveryResponse {
    pub provider: Option<String>,
    pub tracking_id: Option<String>,
    pub tracking_url: Option<String>,
    pub status: Option<String>,
    pub shipped_at: Option<String>,
    pub delivered_at: Option<String>,
}

impl From<Delivery> for DeliveryResponse {
    fn from(delivery: Delivery) -> Self {
        Self {
            provider: delivery.provider,
            tracking_id: delivery.tracking_id,
            tracking_url: delivery.tracking_url,
            status: delivery.status.map(|status| status.as_str().to_string()),
            shipped_at: delivery.shipped_at.map(|at| at.to_string()),
            delivered_at: delivery.delivered_at.map(|at| at.to_string()),
        }
    }
}

/// An order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<OrderItemResponse>,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub subtotal: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub discount: Decimal,

    /// GST on the discounted subtotal
    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub tax: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub total: Decimal,

    pub status: String,
    pub promocode_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub shipping_address: Option<ShippingAddressBody>,
    pub notes: Option<String>,
    pub delivery: Option<DeliveryResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.uuid.into_uuid(),
            user_id: order.user.into_uuid(),
            items: order.items.into_iter().map(Into::into).collect(),
            subtotal: order.subtotal,
            discount: order.discount,
            tax: order.tax,
            total: order.total,
            status: order.status.as_str().to_string(),
            promocode_id: order.promocode.map(PromoCodeUuid::into_uuid),
            payment_id: order.payment.map(|payment| payment.into_uuid()),
            customer_email: order.customer_email,
            customer_phone: order.customer_phone,
            shipping_address: order.shipping_address.map(Into::into),
            notes: order.notes,
            delivery: order.delivery.map(Into::into),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order line as placed from the cart.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemRequest {
    pub product_id: Uuid,

    #[serde(default)]
    pub name: Option<String>,

    /// Cart price the customer saw
    #[salvo(schema(value_type = f64))]
    pub price: Decimal,

    pub quantity: u32,

    #[serde(default)]
    pub image: Option<String>,
}

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,

    #[serde(default)]
    pub promocode_id: Option<Uuid>,

    #[serde(default)]
    pub customer_email: Option<String>,

    #[serde(default)]
    pub customer_phone: Option<String>,

    #[serde(default)]
    pub shipping_address: Option<ShippingAddressBody>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        NewOrder {
            uuid: OrderUuid::new(),
            items: request
                .items
                .into_iter()
                .map(|item| NewOrderItem {
                    product: ProductUuid::from_uuid(item.product_id),
                    name: item.name,
                    price: item.price,
                    quantity: item.quantity,
                    image: item.image,
                })
                .collect(),
            promocode: request.promocode_id.map(PromoCodeUuid::from_uuid),
            customer_email: request.customer_email,
            customer_phone: request.customer_phone,
            shipping_address: request.shipping_address.map(Into::into),
            notes: request.notes,
        }
    }
}

/// Update Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateStatusRequest {
    /// `pending`, `processing`, `confirmed`, `shipped`, `delivered` or `cancelled`
    pub status: String,
}

impl TryFrom<UpdateStatusRequest> for OrderStatus {
    type Error = StatusError;

    fn try_from(request: UpdateStatusRequest) -> Result<Self, Self::Error> {
        request
            .status
            .trim()
            .to_ascii_lowercase()
            .parse::<OrderStatus>()
            .map_err(|_unknown| StatusError::bad_request().brief("Invalid status"))
    }
}

/// Update Delivery Request
///
/// Omitted fields keep their value. Dates that do not parse are ignored.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateDeliveryRequest {
    #[serde(default)]
    pub provider: Option<String>,

    #[serde(default)]
    pub tracking_id: Option<String>,

    #[serde(default)]
    pub tracking_url: Option<String>,

    /// Courier status, e.g. `in_transit`
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub shipped_at: Option<String>,

    #[serde(default)]
    pub delivered_at: Option<String>,
}

impl TryFrom<UpdateDeliveryRequest> for DeliveryPatch {
    type Error = StatusError;

    fn try_from(request: UpdateDeliveryRequest) -> Result<Self, Self::Error> {
        let status = request
            .status
            .map(|status| {
                status
                    .trim()
                    .to_ascii_lowercase()
                    .parse::<DeliveryStatus>()
                    .map_err(|_unknown| {
                        StatusError::bad_request().brief("Invalid delivery status")
                    })
            })
            .transpose()?;

        Ok(DeliveryPatch {
            provider: request.provider,
            tracking_id: request.tracking_id,
            tracking_url: request.tracking_url,
            status,
            shipped_at: request.shipped_at,
            delivered_at: request.delivered_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_request_is_case_insensitive() {
        let status = OrderStatus::try_from(UpdateStatusRequest {
            status: " Shipped ".to_string(),
        });

        assert_eq!(status.ok(), Some(OrderStatus::Shipped));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let status = OrderStatus::try_from(UpdateStatusRequest {
            status: "lost".to_string(),
        });

        assert!(status.is_err(), "unknown status should be rejected");
    }

    #[test]
    fn delivery_request_parses_status() {
        let patch = DeliveryPatch::try_from(UpdateDeliveryRequest {
            status: Some("out_for_delivery".to_string()),
            tracking_id: Some("AWB123".to_string()),
            ..UpdateDeliveryRequest::default()
        });

        let patch = patch.ok();

        assert_eq!(
            patch.as_ref().and_then(|patch| patch.status),
            Some(DeliveryStatus::OutForDelivery)
        );
        assert_eq!(
            patch.and_then(|patch| patch.tracking_id).as_deref(),
            Some("AWB123")
        );
    }

    #[test]
    fn unknown_delivery_status_is_rejected() {
        let patch = DeliveryPatch::try_from(UpdateDeliveryRequest {
            status: Some("teleported".to_string()),
            ..UpdateDeliveryRequest::default()
        });

        assert!(patch.is_err(), "unknown delivery status should be rejected");
    }

    #[test]
    fn address_country_defaults_to_india() {
        let address = ShippingAddress::from(ShippingAddressBody {
            name: "Asha".to_string(),
            country: Some("  ".to_string()),
            ..ShippingAddressBody::default()
        });

        assert_eq!(address.country, "IN");
    }
}
