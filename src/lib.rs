//! Karat
//!
//! Karat is the pure core of a jewelry storefront: live material-based pricing, promo code
//! evaluation, order totals and the order status machine. Nothing in this crate performs I/O.

pub mod material;
pub mod money;
pub mod orders;
pub mod pricing;
pub mod promo;
pub mod rates;
