//! Cart Models

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{
        products::models::{PricedProduct, ProductUuid},
        users::models::UserUuid,
    },
    uuids::TypedUuid,
};

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// One product in a user's cart. A user holds each product at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub user: UserUuid,
    pub product: ProductUuid,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Cart Item Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub product: ProductUuid,
    pub quantity: u32,
}

impl NewCartItem {
    #[must_use]
    pub fn single(product: ProductUuid) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }
}

/// A cart item joined with its live-priced product.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item: CartItem,
    pub product: PricedProduct,
}

impl CartLine {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product
            .price()
            .saturating_mul(Decimal::from(self.item.quantity))
    }
}

/// Priced cart, newest line first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Sum of line totals at current prices.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

/// Result of adding a product: whether a new line was created or an existing one replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct CartAddition {
    pub line: CartLine,
    pub created: bool,
}
