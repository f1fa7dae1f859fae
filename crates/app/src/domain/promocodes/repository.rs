//! Promo Codes Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use karat::promo::DiscountType;
use sqlx::{
    FromRow, Postgres, Row, Transaction,
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    query, query_as, query_scalar,
};

use crate::{
    domain::promocodes::models::{PromoCode, PromoCodeUuid},
    pagination::PageRequest,
};

const GET_PROMOCODE_SQL: &str = include_str!("sql/get_promocode.sql");
const LOCK_PROMOCODE_SQL: &str = include_str!("sql/lock_promocode.sql");
const FIND_PROMOCODE_BY_CODE_SQL: &str = include_str!("sql/find_promocode_by_code.sql");
const LIST_PROMOCODES_SQL: &str = include_str!("sql/list_promocodes.sql");
const COUNT_PROMOCODES_SQL: &str = include_str!("sql/count_promocodes.sql");
const CREATE_PROMOCODE_SQL: &str = include_str!("sql/create_promocode.sql");
const UPDATE_PROMOCODE_SQL: &str = include_str!("sql/update_promocode.sql");
const DELETE_PROMOCODE_SQL: &str = include_str!("sql/delete_promocode.sql");
const REDEEM_PROMOCODE_SQL: &str = include_str!("sql/redeem_promocode.sql");

fn encode_count(count: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(count).map_err(|error| sqlx::Error::Encode(Box::new(error)))
}

fn decode_count(count: i32) -> Result<u32, sqlx::Error> {
    u32::try_from(count).map_err(|error| sqlx::Error::Decode(Box::new(error)))
}

fn bind_columns<'q>(
    statement: QueryAs<'q, Postgres, PromoCode, PgArguments>,
    promo: &'q PromoCode,
) -> Result<QueryAs<'q, Postgres, PromoCode, PgArguments>, sqlx::Error> {
    let usage_limit = promo.usage_limit.map(encode_count).transpose()?;

    Ok(statement
        .bind(promo.uuid)
        .bind(&promo.code)
        .bind(&promo.description)
        .bind(promo.discount_type.as_str())
        .bind(promo.amount)
        .bind(promo.max_discount)
        .bind(promo.min_order_value)
        .bind(promo.starts_at.map(SqlxTimestamp::from))
        .bind(promo.ends_at.map(SqlxTimestamp::from))
        .bind(usage_limit)
        .bind(encode_count(promo.used_count)?)
        .bind(promo.is_active))
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromoCodesRepository;

impl PgPromoCodesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_promocode(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promo: PromoCodeUuid,
    ) -> Result<PromoCode, sqlx::Error> {
        query_as::<Postgres, PromoCode>(GET_PROMOCODE_SQL)
            .bind(promo)
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch a promo code and hold its row lock until the transaction ends.
    pub(crate) async fn lock_promocode(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promo: PromoCodeUuid,
    ) -> Result<PromoCode, sqlx::Error> {
        query_as::<Postgres, PromoCode>(LOCK_PROMOCODE_SQL)
            .bind(promo)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_promocode_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<PromoCode, sqlx::Error> {
        query_as::<Postgres, PromoCode>(FIND_PROMOCODE_BY_CODE_SQL)
            .bind(code)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_promocodes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        page: PageRequest,
    ) -> Result<(Vec<PromoCode>, i64), sqlx::Error> {
        let promos = query_as::<Postgres, PromoCode>(LIST_PROMOCODES_SQL)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut **tx)
            .await?;

        let total: i64 = query_scalar(COUNT_PROMOCODES_SQL)
            .fetch_one(&mut **tx)
            .await?;

        Ok((promos, total))
    }

    pub(crate) async fn create_promocode(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promo: &PromoCode,
    ) -> Result<PromoCode, sqlx::Error> {
        bind_columns(query_as::<Postgres, PromoCode>(CREATE_PROMOCODE_SQL), promo)?
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_promocode(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promo: &PromoCode,
    ) -> Result<PromoCode, sqlx::Error> {
        bind_columns(query_as::<Postgres, PromoCode>(UPDATE_PROMOCODE_SQL), promo)?
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_promocode(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promo: PromoCodeUuid,
    ) -> Result<u64, sqlx::Error> {
        let result = query(DELETE_PROMOCODE_SQL)
            .bind(promo)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    /// Count one redemption. Returns `None` when the usage limit is already reached.
    pub(crate) async fn redeem_promocode(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promo: PromoCodeUuid,
    ) -> Result<Option<PromoCode>, sqlx::Error> {
        query_as::<Postgres, PromoCode>(REDEEM_PROMOCODE_SQL)
            .bind(promo)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PromoCode {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_type: String = row.try_get("discount_type")?;
        let usage_limit: Option<i32> = row.try_get("usage_limit")?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            code: row.try_get("code")?,
            description: row.try_get("description")?,
            discount_type: discount_type
                .parse::<DiscountType>()
                .map_err(|error| sqlx::Error::Decode(Box::new(error)))?,
            amount: row.try_get("amount")?,
            max_discount: row.try_get("max_discount")?,
            min_order_value: row.try_get("min_order_value")?,
            starts_at: row
                .try_get::<Option<SqlxTimestamp>, _>("starts_at")?
                .map(|timestamp| timestamp.to_jiff()),
            ends_at: row
                .try_get::<Option<SqlxTimestamp>, _>("ends_at")?
                .map(|timestamp| timestamp.to_jiff()),
            usage_limit: usage_limit.map(decode_count).transpose()?,
            used_count: decode_count(row.try_get("used_count")?)?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
