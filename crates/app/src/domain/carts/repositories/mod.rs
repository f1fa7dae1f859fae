//! Cart Repositories

mod items;

pub(crate) use items::{PgCartItemsRepository, UpsertedCartItem};
