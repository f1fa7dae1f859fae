//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use karat::material::{Material, MaterialKind};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use sqlx::{
    FromRow, Postgres, Row, Transaction,
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    query, query_as, query_scalar,
    types::Json,
};
use uuid::Uuid;

use crate::{
    domain::{
        products::models::{Product, ProductUuid},
        rates::repository::decode_material,
    },
    pagination::PageRequest,
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const GET_PRODUCT_BY_SLUG_SQL: &str = include_str!("sql/get_product_by_slug.sql");
const LOCK_PRODUCT_SQL: &str = include_str!("sql/lock_product.sql");
const GET_PRODUCTS_SQL: &str = include_str!("sql/get_products.sql");
const LIST_ACTIVE_PRODUCTS_SQL: &str = include_str!("sql/list_active_products.sql");
const COUNT_ACTIVE_PRODUCTS_SQL: &str = include_str!("sql/count_active_products.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

/// Column values written by inserts and updates, in bind order.
#[derive(Debug)]
pub(crate) struct ProductColumns<'a> {
    pub(crate) uuid: ProductUuid,
    pub(crate) name: &'a str,
    pub(crate) slug: &'a str,
    pub(crate) description: &'a str,
    pub(crate) making_cost: Option<Decimal>,
    pub(crate) other_charges: Option<Decimal>,
    pub(crate) stock: u32,
    pub(crate) material: &'a Material,
    pub(crate) attributes: &'a Map<String, Value>,
    pub(crate) images: &'a [String],
    pub(crate) is_active: bool,
    pub(crate) is_featured: bool,
    pub(crate) is_best_seller: bool,
}

impl<'a> From<&'a Product> for ProductColumns<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            uuid: product.uuid,
            name: &product.name,
            slug: &product.slug,
            description: &product.description,
            making_cost: product.making_cost,
            other_charges: product.other_charges,
            stock: product.stock,
            material: &product.material,
            attributes: &product.attributes,
            images: &product.images,
            is_active: product.is_active,
            is_featured: product.is_featured,
            is_best_seller: product.is_best_seller,
        }
    }
}

fn bind_columns<'q>(
    statement: QueryAs<'q, Postgres, Product, PgArguments>,
    columns: &ProductColumns<'q>,
) -> Result<QueryAs<'q, Postgres, Product, PgArguments>, sqlx::Error> {
    let stock = i32::try_from(columns.stock).map_err(|error| sqlx::Error::Encode(Box::new(error)))?;

    Ok(statement
        .bind(columns.uuid)
        .bind(columns.name)
        .bind(columns.slug)
        .bind(columns.description)
        .bind(columns.making_cost)
        .bind(columns.other_charges)
        .bind(stock)
        .bind(columns.material.kind().map(MaterialKind::as_str))
        .bind(columns.material.discriminator())
        .bind(Json(columns.attributes))
        .bind(Json(columns.images))
        .bind(columns.is_active)
        .bind(columns.is_featured)
        .bind(columns.is_best_seller))
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_product_by_slug(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_BY_SLUG_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch a product and hold its row lock until the transaction ends.
    pub(crate) async fn lock_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(LOCK_PRODUCT_SQL)
            .bind(product)
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch every listed product that exists, in no particular order.
    pub(crate) async fn get_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[Uuid],
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCTS_SQL)
            .bind(products)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_active_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        page: PageRequest,
    ) -> Result<(Vec<Product>, i64), sqlx::Error> {
        let products = query_as::<Postgres, Product>(LIST_ACTIVE_PRODUCTS_SQL)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut **tx)
            .await?;

        let total: i64 = query_scalar(COUNT_ACTIVE_PRODUCTS_SQL)
            .fetch_one(&mut **tx)
            .await?;

        Ok((products, total))
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        columns: &ProductColumns<'_>,
    ) -> Result<Product, sqlx::Error> {
        bind_columns(query_as::<Postgres, Product>(CREATE_PRODUCT_SQL), columns)?
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        columns: &ProductColumns<'_>,
    ) -> Result<Product, sqlx::Error> {
        bind_columns(query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL), columns)?
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let result = query(DELETE_PRODUCT_SQL)
            .bind(product)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let material: Option<String> = row.try_get("material")?;
        let material_type: Option<String> = row.try_get("material_type")?;
        let stock: i32 = row.try_get("stock")?;
        let Json(attributes) = row.try_get::<Json<Map<String, Value>>, _>("attributes")?;
        let Json(images) = row.try_get::<Json<Vec<String>>, _>("images")?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            description: row.try_get("description")?,
            making_cost: row.try_get("making_cost")?,
            other_charges: row.try_get("other_charges")?,
            stock: u32::try_from(stock).map_err(|error| sqlx::Error::Decode(Box::new(error)))?,
            material: decode_material(material.as_deref(), material_type.as_deref())?,
            attributes,
            images,
            is_active: row.try_get("is_active")?,
            is_featured: row.try_get("is_featured")?,
            is_best_seller: row.try_get("is_best_seller")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
