//! Cart request and response models.

use karat_app::domain::carts::models::{Cart, CartLine};
use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::products::models::ProductResponse;

/// One cart line at the product's current price.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLineResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub line_total: Decimal,

    pub product: ProductResponse,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        let line_total = line.line_total();

        Self {
            id: line.item.uuid.into_uuid(),
            product_id: line.item.product.into_uuid(),
            quantity: line.item.quantity,
            line_total,
            product: line.product.into(),
            created_at: line.item.created_at.to_string(),
            updated_at: line.item.updated_at.to_string(),
        }
    }
}

/// The caller's cart.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    pub items: Vec<CartLineResponse>,

    /// Sum of line totals at current prices
    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub subtotal: Decimal,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        let subtotal = cart.subtotal();

        Self {
            items: cart.lines.into_iter().map(Into::into).collect(),
            subtotal,
        }
    }
}

fn default_quantity() -> u32 {
    1
}

/// Add To Cart Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddCartItemRequest {
    pub product_id: Uuid,

    /// Replaces the quantity of an existing line; defaults to 1
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}
