//! Rates Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use karat::{
    material::{Material, MaterialKind},
    rates::{RateBook, RateDemand},
};
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    domain::rates::models::{
        DiamondType, DiamondTypeUuid, MaterialRate, NewDiamondType, NewMaterialRate, RateUuid,
    },
    pagination::PageRequest,
};

const CREATE_RATE_SQL: &str = include_str!("sql/create_rate.sql");
const DELETE_RATE_SQL: &str = include_str!("sql/delete_rate.sql");
const LIST_RATES_SQL: &str = include_str!("sql/list_rates.sql");
const COUNT_RATES_SQL: &str = include_str!("sql/count_rates.sql");
const CURRENT_RATES_SQL: &str = include_str!("sql/current_rates.sql");
const ALL_CURRENT_RATES_SQL: &str = include_str!("sql/all_current_rates.sql");
const CREATE_DIAMOND_TYPE_SQL: &str = include_str!("sql/create_diamond_type.sql");
const LIST_DIAMOND_TYPES_SQL: &str = include_str!("sql/list_diamond_types.sql");
const GET_DIAMOND_TYPES_SQL: &str = include_str!("sql/get_diamond_types.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRatesRepository;

impl PgRatesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_rate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        rate: &NewMaterialRate,
    ) -> Result<MaterialRate, sqlx::Error> {
        let diamond_type = match rate.material {
            Material::Diamond { diamond_type } => Some(diamond_type),
            Material::None | Material::Gold { .. } | Material::Silver { .. } => None,
        };

        query_as::<Postgres, MaterialRate>(CREATE_RATE_SQL)
            .bind(rate.uuid)
            .bind(rate.material.kind().map(MaterialKind::as_str))
            .bind(rate.material.discriminator())
            .bind(diamond_type)
            .bind(rate.rate)
            .bind(rate.effective_at.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_rate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        rate: RateUuid,
    ) -> Result<u64, sqlx::Error> {
        let result = query(DELETE_RATE_SQL).bind(rate).execute(&mut **tx).await?;

        Ok(result.rows_affected())
    }

    pub(crate) async fn list_rates(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        material: Option<MaterialKind>,
        page: PageRequest,
    ) -> Result<(Vec<MaterialRate>, i64), sqlx::Error> {
        let material = material.map(MaterialKind::as_str);

        let rates = query_as::<Postgres, MaterialRate>(LIST_RATES_SQL)
            .bind(material)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut **tx)
            .await?;

        let total: i64 = query_scalar(COUNT_RATES_SQL)
            .bind(material)
            .fetch_one(&mut **tx)
            .await?;

        Ok((rates, total))
    }

    /// Load the current rate for every discriminator in `demand` with one query.
    pub(crate) async fn rate_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        demand: &RateDemand,
    ) -> Result<RateBook, sqlx::Error> {
        if demand.is_empty() {
            return Ok(RateBook::new());
        }

        let (materials, discriminators): (Vec<String>, Vec<String>) = demand
            .pairs()
            .into_iter()
            .map(|(kind, discriminator)| (kind.as_str().to_string(), discriminator))
            .unzip();

        let rates = query_as::<Postgres, MaterialRate>(CURRENT_RATES_SQL)
            .bind(materials)
            .bind(discriminators)
            .fetch_all(&mut **tx)
            .await?;

        let mut book = RateBook::new();

        for rate in &rates {
            book.insert(&rate.material, rate.rate);
        }

        Ok(book)
    }

    /// The current rate of every discriminator that has one.
    pub(crate) async fn current_rates(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<MaterialRate>, sqlx::Error> {
        query_as::<Postgres, MaterialRate>(ALL_CURRENT_RATES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_diamond_type(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        diamond_type: &NewDiamondType,
    ) -> Result<DiamondType, sqlx::Error> {
        query_as::<Postgres, DiamondType>(CREATE_DIAMOND_TYPE_SQL)
            .bind(diamond_type.uuid)
            .bind(diamond_type.origin.as_str())
            .bind(&diamond_type.shape)
            .bind(diamond_type.cut.as_str())
            .bind(&diamond_type.color)
            .bind(&diamond_type.clarity)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_diamond_types(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<DiamondType>, sqlx::Error> {
        query_as::<Postgres, DiamondType>(LIST_DIAMOND_TYPES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_diamond_types(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuids: &[Uuid],
    ) -> Result<Vec<DiamondType>, sqlx::Error> {
        query_as::<Postgres, DiamondType>(GET_DIAMOND_TYPES_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }
}

/// Decode a stored `(material, discriminator)` pair.
pub(crate) fn decode_material(
    material: Option<&str>,
    discriminator: Option<&str>,
) -> sqlx::Result<Material> {
    let (Some(material), Some(discriminator)) = (material, discriminator) else {
        return Ok(Material::None);
    };

    material
        .parse::<MaterialKind>()
        .and_then(|kind| Material::from_discriminator(kind, discriminator))
        .map_err(|error| sqlx::Error::Decode(Box::new(error)))
}

impl<'r> FromRow<'r, PgRow> for MaterialRate {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let material: String = row.try_get("material")?;
        let discriminator: String = row.try_get("discriminator")?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            material: decode_material(Some(&material), Some(&discriminator))?,
            rate: row.try_get::<Decimal, _>("rate")?,
            effective_at: row.try_get::<SqlxTimestamp, _>("effective_at")?.to_jiff(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for DiamondType {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let origin: String = row.try_get("origin")?;
        let cut: String = row.try_get("cut")?;

        Ok(Self {
            uuid: row.try_get::<DiamondTypeUuid, _>("uuid")?,
            origin: origin
                .parse()
                .map_err(|error| sqlx::Error::Decode(Box::new(error)))?,
            shape: row.try_get("shape")?,
            cut: cut
                .parse()
                .map_err(|error| sqlx::Error::Decode(Box::new(error)))?,
            color: row.try_get("color")?,
            clarity: row.try_get("clarity")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
