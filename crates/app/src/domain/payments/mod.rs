//! Payments

pub mod errors;
pub mod gateway;
pub mod models;
pub mod razorpay;
pub(crate) mod repository;
pub mod service;
pub mod signature;

pub use errors::PaymentsServiceError;
pub use gateway::{GatewayError, MockPaymentGateway, PaymentGateway};
pub use razorpay::{RazorpayClient, RazorpayConfig};
pub use service::*;
