//! Order Models

use jiff::Timestamp;
use karat::orders::{Delivery, LineItem, OrderStatus, OrderTotals};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        payments::models::PaymentUuid, products::models::ProductUuid,
        promocodes::models::PromoCodeUuid, users::models::UserUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Name used for a line whose client and catalog names are both blank.
pub const FALLBACK_ITEM_NAME: &str = "Product";

/// Country assumed when an address omits one.
pub const DEFAULT_COUNTRY: &str = "IN";

/// Snapshot of one ordered product, frozen at order time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product: ProductUuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl OrderItem {
    #[must_use]
    pub fn line(&self) -> LineItem {
        LineItem {
            unit_price: self.price,
            quantity: self.quantity,
        }
    }
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

/// Where an order ships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

impl ShippingAddress {
    /// Postal lines: street lines, `city, state`, postal code and country, skipping blanks.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let locality = [self.city.trim(), self.state.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        [
            self.line1.trim(),
            self.line2.as_deref().unwrap_or_default().trim(),
            locality.as_str(),
            self.postal_code.trim(),
            self.country.trim(),
        ]
        .into_iter()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
    }
}

/// Order Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user: UserUuid,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub promocode: Option<PromoCodeUuid>,
    pub payment: Option<PaymentUuid>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub shipping_address: Option<ShippingAddress>,
    pub notes: Option<String>,
    pub delivery: Option<Delivery>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        OrderTotals {
            subtotal: self.subtotal,
            discount: self.discount,
            tax: self.tax,
            total: self.total,
        }
    }

    /// Last eight characters of the id, as shown to customers.
    #[must_use]
    pub fn short_id(&self) -> String {
        let id = self.uuid.to_string();
        let skip = id.chars().count().saturating_sub(8);

        id.chars().skip(skip).collect()
    }

    /// Name on the shipping address, if any.
    #[must_use]
    pub fn recipient_name(&self) -> Option<&str> {
        self.shipping_address
            .as_ref()
            .map(|address| address.name.trim())
            .filter(|name| !name.is_empty())
    }
}

/// Client-supplied order line. The price is the cart price the customer saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product: ProductUuid,
    pub name: Option<String>,
    pub price: Decimal,
    pub quantity: u32,
    pub image: Option<String>,
}

/// New Order Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub items: Vec<NewOrderItem>,
    pub promocode: Option<PromoCodeUuid>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub shipping_address: Option<ShippingAddress>,
    pub notes: Option<String>,
}

/// Trim an optional text field, treating blank as absent.
pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_lines_skip_blank_parts() {
        let address = ShippingAddress {
            name: "Asha".to_string(),
            line1: "12 MG Road".to_string(),
            line2: Some("  ".to_string()),
            city: "Jaipur".to_string(),
            postal_code: "302001".to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            ..ShippingAddress::default()
        };

        assert_eq!(
            address.lines(),
            vec!["12 MG Road", "Jaipur", "302001", "IN"]
        );
    }

    #[test]
    fn missing_country_defaults_to_india() -> Result<(), serde_json::Error> {
        let address: ShippingAddress = serde_json::from_value(serde_json::json!({
            "name": "Ravi",
            "line1": "4 Park Street",
            "city": "Kolkata",
            "state": "WB",
            "postalCode": "700016"
        }))?;

        assert_eq!(address.country, "IN");
        assert_eq!(address.postal_code, "700016");

        Ok(())
    }

    #[test]
    fn trimmed_drops_blank_values() {
        assert_eq!(trimmed(Some("  ".to_string())), None);
        assert_eq!(trimmed(Some(" a@b.in ".to_string())), Some("a@b.in".to_string()));
        assert_eq!(trimmed(None), None);
    }
}
