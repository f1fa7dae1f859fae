//! Carts service.

use async_trait::async_trait;
use karat::pricing::rate_demand;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{Cart, CartAddition, CartItem, CartLine, NewCartItem},
            repositories::PgCartItemsRepository,
        },
        products::{
            models::{PricedProduct, ProductUuid},
            repository::PgProductsRepository,
        },
        rates::repository::PgRatesRepository,
        users::models::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
    rates_repository: PgRatesRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
            rates_repository: PgRatesRepository::new(),
        }
    }

    /// Join items with their products, pricing every product against one rate snapshot.
    async fn price_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: Vec<CartItem>,
    ) -> Result<Vec<CartLine>, CartsServiceError> {
        let product_uuids: Vec<Uuid> = items.iter().map(|item| item.product.into_uuid()).collect();

        let products = self
            .products_repository
            .get_products(tx, &product_uuids)
            .await?;

        let book = self
            .rates_repository
            .rate_book(tx, &rate_demand(&products))
            .await?;

        let mut priced: FxHashMap<ProductUuid, PricedProduct> = products
            .into_iter()
            .map(|product| (product.uuid, PricedProduct::new(product, &book)))
            .collect();

        // Each product appears at most once per cart.
        Ok(items
            .into_iter()
            .filter_map(|item| {
                priced
                    .remove(&item.product)
                    .map(|product| CartLine { item, product })
            })
            .collect())
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let items = self.items_repository.list_cart_items(&mut tx, user).await?;
        let lines = self.price_lines(&mut tx, items).await?;

        tx.commit().await?;

        Ok(Cart { lines })
    }

    #[instrument(skip(self, item), fields(product_uuid = %item.product))]
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartAddition, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        self.products_repository
            .get_product(&mut tx, item.product)
            .await?;

        let upserted = self
            .items_repository
            .upsert_cart_item(&mut tx, user, &item)
            .await?;

        let line = self
            .price_lines(&mut tx, vec![upserted.item])
            .await?
            .pop()
            .ok_or(CartsServiceError::ProductNotFound)?;

        tx.commit().await?;

        info!(created = upserted.inserted, "cart item saved");

        Ok(CartAddition {
            line,
            created: upserted.inserted,
        })
    }

    #[instrument(skip(self))]
    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .items_repository
            .delete_cart_item(&mut tx, user, product)
            .await?;

        tx.commit().await?;

        if rows_affected > 0 {
            info!("cart item removed");
        }

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The user's cart, newest line first, priced against the current rates.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Put a product in the cart, replacing the quantity of an existing line.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartAddition, CartsServiceError>;

    /// Take a product out of the cart. Removing an absent product succeeds.
    async fn remove_item(&self, user: UserUuid, product: ProductUuid)
    -> Result<(), CartsServiceError>;
}
