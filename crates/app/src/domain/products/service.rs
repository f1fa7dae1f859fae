//! Products service.

use async_trait::async_trait;
use jiff::Timestamp;
use karat::pricing::rate_demand;
use mockall::automock;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use tracing::{info, instrument};

use crate::{
    database::Db,
    domain::{
        products::{
            errors::ProductsServiceError,
            models::{
                NewProduct, PricedProduct, Product, ProductKey, ProductUpdate, ProductUuid,
                slugify, sync_purity,
            },
            repository::{PgProductsRepository, ProductColumns},
        },
        rates::repository::PgRatesRepository,
    },
    pagination::{Page, PageRequest},
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
    rates: PgRatesRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
            rates: PgRatesRepository::new(),
        }
    }

    /// Price products against one rate snapshot loaded inside `tx`.
    async fn price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: Vec<Product>,
    ) -> Result<Vec<PricedProduct>, ProductsServiceError> {
        let book = self.rates.rate_book(tx, &rate_demand(&products)).await?;

        Ok(products
            .into_iter()
            .map(|product| PricedProduct::new(product, &book))
            .collect())
    }

    async fn price_one(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: Product,
    ) -> Result<PricedProduct, ProductsServiceError> {
        self.price(tx, vec![product])
            .await?
            .pop()
            .ok_or(ProductsServiceError::NotFound)
    }
}

/// Trim text fields, derive the slug and purity, and reject unusable values.
fn normalize(product: &mut Product) -> Result<(), ProductsServiceError> {
    product.name = product.name.trim().to_string();
    product.slug = slugify(&product.slug);
    product.images = product
        .images
        .iter()
        .map(|image| image.trim().to_string())
        .filter(|image| !image.is_empty())
        .collect();

    if product.name.is_empty() {
        return Err(ProductsServiceError::MissingRequiredData);
    }

    if product.slug.is_empty() {
        product.slug = slugify(&product.name);
    }

    if product.slug.is_empty() {
        return Err(ProductsServiceError::InvalidData);
    }

    let negative = |amount: Option<Decimal>| amount.is_some_and(|amount| amount < Decimal::ZERO);

    if negative(product.making_cost) || negative(product.other_charges) {
        return Err(ProductsServiceError::InvalidData);
    }

    if i32::try_from(product.stock).is_err() {
        return Err(ProductsServiceError::InvalidData);
    }

    sync_purity(&product.material, &mut product.attributes);

    Ok(())
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        page: PageRequest,
    ) -> Result<Page<PricedProduct>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let (products, total) = self.repository.list_active_products(&mut tx, page).await?;
        let priced = self.price(&mut tx, products).await?;

        tx.commit().await?;

        Ok(Page::new(priced, total, page))
    }

    async fn get_product(&self, key: ProductKey) -> Result<PricedProduct, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = match &key {
            ProductKey::Uuid(uuid) => self.repository.get_product(&mut tx, *uuid).await?,
            ProductKey::Slug(slug) => self.repository.get_product_by_slug(&mut tx, slug).await?,
        };

        let priced = self.price_one(&mut tx, product).await?;

        tx.commit().await?;

        Ok(priced)
    }

    #[instrument(skip(self, product), fields(product_uuid = %product.uuid))]
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<PricedProduct, ProductsServiceError> {
        let slug = product.slug.unwrap_or_else(|| product.name.clone());

        let mut draft = Product {
            uuid: product.uuid,
            name: product.name,
            slug,
            description: product.description,
            making_cost: product.making_cost,
            other_charges: product.other_charges,
            stock: product.stock,
            material: product.material,
            attributes: product.attributes,
            images: product.images,
            is_active: product.is_active,
            is_featured: product.is_featured,
            is_best_seller: product.is_best_seller,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };

        normalize(&mut draft)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_product(&mut tx, &ProductColumns::from(&draft))
            .await?;

        let priced = self.price_one(&mut tx, created).await?;

        tx.commit().await?;

        info!(slug = %priced.product.slug, "product created");

        Ok(priced)
    }

    #[instrument(skip(self, update))]
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<PricedProduct, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut current = self.repository.lock_product(&mut tx, product).await?;

        update.apply(&mut current);
        normalize(&mut current)?;

        let updated = self
            .repository
            .update_product(&mut tx, &ProductColumns::from(&current))
            .await?;

        let priced = self.price_one(&mut tx, updated).await?;

        tx.commit().await?;

        info!("product updated");

        Ok(priced)
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        info!("product deleted");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// List active products, newest first, each priced against the current rates.
    async fn list_products(
        &self,
        page: PageRequest,
    ) -> Result<Page<PricedProduct>, ProductsServiceError>;

    /// Retrieve and price a product by UUID or slug, whether or not it is active.
    async fn get_product(&self, key: ProductKey) -> Result<PricedProduct, ProductsServiceError>;

    /// Create a product.
    async fn create_product(&self, product: NewProduct)
    -> Result<PricedProduct, ProductsServiceError>;

    /// Apply a partial update to a product.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<PricedProduct, ProductsServiceError>;

    /// Delete a product. Order snapshots that name it are unaffected.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;
}
