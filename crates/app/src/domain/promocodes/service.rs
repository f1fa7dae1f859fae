//! Promo codes service.

use async_trait::async_trait;
use jiff::Timestamp;
use karat::promo::{DiscountType, evaluate, normalize_code};
use mockall::automock;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::{
    database::Db,
    domain::promocodes::{
        errors::PromoCodesServiceError,
        models::{NewPromoCode, PromoCode, PromoCodeUpdate, PromoCodeUuid, PromoValidation},
        repository::PgPromoCodesRepository,
    },
    pagination::{Page, PageRequest},
};

#[derive(Debug, Clone)]
pub struct PgPromoCodesService {
    db: Db,
    repository: PgPromoCodesRepository,
}

impl PgPromoCodesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPromoCodesRepository::new(),
        }
    }
}

fn normalize(promo: &mut PromoCode) -> Result<(), PromoCodesServiceError> {
    promo.code = normalize_code(&promo.code);
    promo.description = promo.description.trim().to_string();

    if promo.code.is_empty() {
        return Err(PromoCodesServiceError::MissingRequiredData);
    }

    let negative = |amount: Option<Decimal>| amount.is_some_and(|amount| amount < Decimal::ZERO);

    if promo.amount < Decimal::ZERO
        || negative(promo.max_discount)
        || negative(promo.min_order_value)
    {
        return Err(PromoCodesServiceError::InvalidData);
    }

    if promo.discount_type == DiscountType::Percent && promo.amount > Decimal::ONE_HUNDRED {
        return Err(PromoCodesServiceError::InvalidData);
    }

    if let (Some(starts_at), Some(ends_at)) = (promo.starts_at, promo.ends_at)
        && ends_at < starts_at
    {
        return Err(PromoCodesServiceError::InvalidData);
    }

    Ok(())
}

#[async_trait]
impl PromoCodesService for PgPromoCodesService {
    async fn list_promocodes(
        &self,
        page: PageRequest,
    ) -> Result<Page<PromoCode>, PromoCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let (promos, total) = self.repository.list_promocodes(&mut tx, page).await?;

        tx.commit().await?;

        Ok(Page::new(promos, total, page))
    }

    async fn get_promocode(
        &self,
        promo: PromoCodeUuid,
    ) -> Result<PromoCode, PromoCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let promo = self.repository.get_promocode(&mut tx, promo).await?;

        tx.commit().await?;

        Ok(promo)
    }

    #[instrument(skip(self, promo), fields(promo_uuid = %promo.uuid))]
    async fn create_promocode(
        &self,
        promo: NewPromoCode,
    ) -> Result<PromoCode, PromoCodesServiceError> {
        let mut draft = PromoCode {
            uuid: promo.uuid,
            code: promo.code,
            description: promo.description,
            discount_type: promo.discount_type,
            amount: promo.amount,
            max_discount: promo.max_discount,
            min_order_value: promo.min_order_value,
            starts_at: promo.starts_at,
            ends_at: promo.ends_at,
            usage_limit: promo.usage_limit,
            used_count: 0,
            is_active: promo.is_active,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };

        normalize(&mut draft)?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_promocode(&mut tx, &draft).await?;

        tx.commit().await?;

        info!(code = %created.code, "promo code created");

        Ok(created)
    }

    #[instrument(skip(self, update))]
    async fn update_promocode(
        &self,
        promo: PromoCodeUuid,
        update: PromoCodeUpdate,
    ) -> Result<PromoCode, PromoCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let mut current = self.repository.lock_promocode(&mut tx, promo).await?;

        update.apply(&mut current);
        normalize(&mut current)?;

        let updated = self.repository.update_promocode(&mut tx, &current).await?;

        tx.commit().await?;

        info!(code = %updated.code, "promo code updated");

        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_promocode(&self, promo: PromoCodeUuid) -> Result<(), PromoCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_promocode(&mut tx, promo).await?;

        if rows_affected == 0 {
            return Err(PromoCodesServiceError::NotFound);
        }

        tx.commit().await?;

        info!("promo code deleted");

        Ok(())
    }

    async fn validate(
        &self,
        code: &str,
        order_total: Decimal,
        now: Timestamp,
    ) -> Result<PromoValidation, PromoCodesServiceError> {
        let code = normalize_code(code);

        if code.is_empty() {
            return Err(PromoCodesServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let promo = self.repository.find_promocode_by_code(&mut tx, &code).await?;

        tx.commit().await?;

        let outcome = evaluate(&promo.terms(), order_total, now)?;

        Ok(PromoValidation { promo, outcome })
    }
}

#[automock]
#[async_trait]
pub trait PromoCodesService: Send + Sync {
    /// List promo codes, newest first.
    async fn list_promocodes(
        &self,
        page: PageRequest,
    ) -> Result<Page<PromoCode>, PromoCodesServiceError>;

    async fn get_promocode(&self, promo: PromoCodeUuid)
    -> Result<PromoCode, PromoCodesServiceError>;

    /// Create a promo code. The code is stored trimmed and uppercase.
    async fn create_promocode(
        &self,
        promo: NewPromoCode,
    ) -> Result<PromoCode, PromoCodesServiceError>;

    /// Apply a partial update to a promo code.
    async fn update_promocode(
        &self,
        promo: PromoCodeUuid,
        update: PromoCodeUpdate,
    ) -> Result<PromoCode, PromoCodesServiceError>;

    async fn delete_promocode(&self, promo: PromoCodeUuid) -> Result<(), PromoCodesServiceError>;

    /// Preview a code against an order total without redeeming it.
    async fn validate(
        &self,
        code: &str,
        order_total: Decimal,
        now: Timestamp,
    ) -> Result<PromoValidation, PromoCodesServiceError>;
}

#[cfg(test)]
mod tests {
    use karat::promo::PromoRejection;
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::fixed_promo};

    use super::*;

    #[tokio::test]
    async fn create_normalizes_code() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .promocodes
            .create_promocode(fixed_promo("  diwali300 ", 300))
            .await?;

        assert_eq!(created.code, "DIWALI300");
        assert_eq!(created.used_count, 0);

        let fetched = ctx.promocodes.get_promocode(created.uuid).await?;

        assert_eq!(fetched, created);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_code_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.promocodes
            .create_promocode(fixed_promo("SAVE", 100))
            .await?;

        let result = ctx
            .promocodes
            .create_promocode(fixed_promo("save", 200))
            .await;

        assert!(
            matches!(result, Err(PromoCodesServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn percent_over_hundred_is_invalid() {
        let ctx = TestContext::new().await;

        let result = ctx
            .promocodes
            .create_promocode(NewPromoCode {
                discount_type: DiscountType::Percent,
                amount: Decimal::from(101),
                ..fixed_promo("GREEDY", 0)
            })
            .await;

        assert!(
            matches!(result, Err(PromoCodesServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn validate_applies_fixed_discount() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.promocodes
            .create_promocode(fixed_promo("FLAT300", 300))
            .await?;

        let validation = ctx
            .promocodes
            .validate("flat300", Decimal::from(2_000), Timestamp::now())
            .await?;

        assert_eq!(validation.outcome.discount, Decimal::from(300));
        assert_eq!(validation.outcome.total_after, Decimal::from(1_700));
        assert_eq!(validation.promo.used_count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn validate_below_minimum_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.promocodes
            .create_promocode(NewPromoCode {
                min_order_value: Some(Decimal::from(5_000)),
                ..fixed_promo("BIGSPEND", 500)
            })
            .await?;

        let result = ctx
            .promocodes
            .validate("BIGSPEND", Decimal::from(2_000), Timestamp::now())
            .await;

        assert!(
            matches!(
                result,
                Err(PromoCodesServiceError::Rejected(
                    PromoRejection::MinimumOrderValue { .. }
                ))
            ),
            "expected MinimumOrderValue, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn validate_unknown_code_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .promocodes
            .validate("NOPE", Decimal::from(1_000), Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(PromoCodesServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_can_clear_usage_limit() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .promocodes
            .create_promocode(NewPromoCode {
                usage_limit: Some(1),
                ..fixed_promo("ONCE", 100)
            })
            .await?;

        let updated = ctx
            .promocodes
            .update_promocode(
                created.uuid,
                PromoCodeUpdate {
                    usage_limit: Some(None),
                    is_active: Some(false),
                    ..PromoCodeUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.usage_limit, None);
        assert!(!updated.is_active);
        assert_eq!(updated.code, "ONCE");

        Ok(())
    }
}
