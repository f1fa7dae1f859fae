//! Orders
//!
//! Order arithmetic, the order status machine and the delivery sub-record.

use std::{fmt, str::FromStr};

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::{round_paise, round_rupees};

/// Flat GST rate applied to the discounted subtotal (3%).
pub const GST_RATE: Decimal = Decimal::from_parts(3, 0, 0, false, 2);

/// One snapshotted order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    /// Unit price in rupees.
    pub unit_price: Decimal,

    /// Units ordered, at least one.
    pub quantity: u32,
}

impl LineItem {
    /// Unit price times quantity, `None` when the product does not fit a decimal.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Order amounts too large to represent.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("order amount out of range")]
pub struct AmountOverflow;

/// Financial summary of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    /// Sum of line totals.
    pub subtotal: Decimal,

    /// Promo discount, within `[0, subtotal]`.
    pub discount: Decimal,

    /// GST on the discounted subtotal, whole rupees.
    pub tax: Decimal,

    /// `subtotal - discount + tax`.
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute totals for a set of lines and a proposed discount. The discount
    /// is clamped into `[0, subtotal]`.
    ///
    /// # Errors
    ///
    /// Returns [`AmountOverflow`] when a line total, the subtotal or the taxed
    /// total exceeds the decimal range.
    pub fn compute(lines: &[LineItem], discount: Decimal) -> Result<Self, AmountOverflow> {
        let subtotal = lines.iter().try_fold(Decimal::ZERO, |sum, line| {
            line.line_total()
                .and_then(|total| sum.checked_add(total))
                .ok_or(AmountOverflow)
        })?;

        let subtotal = round_paise(subtotal);
        let discount = discount.max(Decimal::ZERO).min(subtotal);
        let discounted = subtotal - discount;

        let tax = round_rupees(discounted.checked_mul(GST_RATE).ok_or(AmountOverflow)?);
        let total = discounted.checked_add(tax).ok_or(AmountOverflow)?;

        Ok(Self {
            subtotal,
            discount,
            tax,
            total,
        })
    }
}

/// Order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting payment or review.
    Pending,
    /// Being prepared.
    Processing,
    /// Paid or accepted.
    Confirmed,
    /// Handed to a courier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Abandoned before delivery.
    Cancelled,
}

/// Outcome of a status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// The order already had the requested status.
    Unchanged,

    /// The status moved.
    Changed {
        /// Previous status.
        from: OrderStatus,
        /// New status.
        to: OrderStatus,
    },
}

impl OrderStatus {
    /// Every status.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Processing,
        Self::Confirmed,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Compare the current status with a requested one.
    ///
    /// Any status may follow any other. Requesting the current status is a no-op.
    #[must_use]
    pub fn transition_to(self, next: Self) -> StatusChange {
        if self == next {
            StatusChange::Unchanged
        } else {
            StatusChange::Changed {
                from: self,
                to: next,
            }
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Courier-side delivery progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// Not yet packed.
    Pending,
    /// Packed, awaiting pickup.
    Packed,
    /// Picked up.
    Shipped,
    /// Between hubs.
    InTransit,
    /// With the last-mile courier.
    OutForDelivery,
    /// Received.
    Delivered,
    /// Sent back.
    Returned,
    /// Called off.
    Cancelled,
}

impl DeliveryStatus {
    /// Every delivery status.
    pub const ALL: [Self; 8] = [
        Self::Pending,
        Self::Packed,
        Self::Shipped,
        Self::InTransit,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Returned,
        Self::Cancelled,
    ];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Packed => "packed",
            Self::Shipped => "shipped",
            Self::InTransit => "in_transit",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Returned => "returned",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for DeliveryStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Delivery sub-record of an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    /// Courier name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Courier tracking number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,

    /// Tracking page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_url: Option<String>,

    /// Courier status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeliveryStatus>,

    /// When the parcel left.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipped_at: Option<Timestamp>,

    /// When the parcel arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<Timestamp>,
}

/// Partial delivery update. Absent fields leave the record untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryPatch {
    /// New courier name.
    pub provider: Option<String>,
    /// New tracking number.
    pub tracking_id: Option<String>,
    /// New tracking page.
    pub tracking_url: Option<String>,
    /// New courier status.
    pub status: Option<DeliveryStatus>,
    /// Raw shipped-at date; ignored when it does not parse.
    pub shipped_at: Option<String>,
    /// Raw delivered-at date; ignored when it does not parse.
    pub delivered_at: Option<String>,
}

impl Delivery {
    /// Merge a patch field by field.
    pub fn merge(&mut self, patch: DeliveryPatch) {
        if let Some(provider) = patch.provider {
            self.provider = Some(provider.trim().to_string());
        }

        if let Some(tracking_id) = patch.tracking_id {
            self.tracking_id = Some(tracking_id.trim().to_string());
        }

        if let Some(tracking_url) = patch.tracking_url {
            self.tracking_url = Some(tracking_url.trim().to_string());
        }

        if let Some(status) = patch.status {
            self.status = Some(status);
        }

        if let Some(shipped_at) = patch.shipped_at.as_deref().and_then(parse_timestamp) {
            self.shipped_at = Some(shipped_at);
        }

        if let Some(delivered_at) = patch.delivered_at.as_deref().and_then(parse_timestamp) {
            self.delivered_at = Some(delivered_at);
        }
    }
}

/// Parse an RFC 3339 instant or a bare `YYYY-MM-DD` date (midnight UTC).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();

    if let Ok(timestamp) = raw.parse::<Timestamp>() {
        return Some(timestamp);
    }

    raw.parse::<Date>()
        .ok()
        .and_then(|date| date.to_zoned(TimeZone::UTC).ok())
        .map(|zoned| zoned.timestamp())
}
