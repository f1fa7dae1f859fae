//! Storefront domain services and their repositories.

pub mod carts;
pub mod orders;
pub mod payments;
pub mod products;
pub mod promocodes;
pub mod rates;
pub mod users;
