//! Notification events

use karat::orders::OrderStatus;
use zeroize::Zeroizing;

use crate::{
    auth::otp::OtpPurpose,
    domain::{orders::models::Order, users::models::User},
};

/// A passcode to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpMessage {
    pub to: String,
    pub purpose: OtpPurpose,
    pub code: Zeroizing<String>,
}

/// Something customers or the store should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    OtpIssued(OtpMessage),

    /// A new order was committed.
    OrderPlaced { order: Box<Order>, customer: Box<User> },

    /// An order's status actually moved.
    OrderStatusChanged {
        order: Box<Order>,
        customer: Box<User>,
        from: OrderStatus,
        to: OrderStatus,
    },
}

impl NotificationEvent {
    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::OtpIssued(_) => "otp_issued",
            Self::OrderPlaced { .. } => "order_placed",
            Self::OrderStatusChanged { .. } => "order_status_changed",
        }
    }
}
