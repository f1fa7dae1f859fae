//! Rates service.

use std::cmp::Reverse;

use async_trait::async_trait;
use karat::{
    material::{Material, MaterialKind},
    rates::{RateBook, RateDemand},
};
use mockall::automock;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use tracing::{info, instrument};

use crate::{
    database::Db,
    domain::rates::{
        errors::RatesServiceError,
        models::{
            DiamondType, MaterialRate, MaterialTypeCatalog, MaterialTypeOption, NewDiamondType,
            NewMaterialRate, RateUuid,
        },
        repository::PgRatesRepository,
    },
    pagination::{Page, PageRequest},
};

#[derive(Debug, Clone)]
pub struct PgRatesService {
    db: Db,
    repository: PgRatesRepository,
}

impl PgRatesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgRatesRepository::new(),
        }
    }
}

#[async_trait]
impl RatesService for PgRatesService {
    async fn list_rates(
        &self,
        material: Option<MaterialKind>,
        page: PageRequest,
    ) -> Result<Page<MaterialRate>, RatesServiceError> {
        let mut tx = self.db.begin().await?;

        let (rates, total) = self.repository.list_rates(&mut tx, material, page).await?;

        tx.commit().await?;

        Ok(Page::new(rates, total, page))
    }

    #[instrument(skip(self), fields(rate_uuid = %rate.uuid))]
    async fn create_rate(&self, rate: NewMaterialRate) -> Result<MaterialRate, RatesServiceError> {
        if rate.material == Material::None {
            return Err(RatesServiceError::MissingRequiredData);
        }

        if rate.rate < Decimal::ZERO {
            return Err(RatesServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_rate(&mut tx, &rate).await?;

        tx.commit().await?;

        info!(material = ?created.material, rate = %created.rate, "rate recorded");

        Ok(created)
    }

    #[instrument(skip(self))]
    async fn delete_rate(&self, rate: RateUuid) -> Result<(), RatesServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_rate(&mut tx, rate).await?;

        if rows_affected == 0 {
            return Err(RatesServiceError::NotFound);
        }

        tx.commit().await?;

        info!(%rate, "rate deleted");

        Ok(())
    }

    async fn rate_book(&self, demand: &RateDemand) -> Result<RateBook, RatesServiceError> {
        let mut tx = self.db.begin().await?;

        let book = self.repository.rate_book(&mut tx, demand).await?;

        tx.commit().await?;

        Ok(book)
    }

    async fn material_types(&self) -> Result<MaterialTypeCatalog, RatesServiceError> {
        let mut tx = self.db.begin().await?;

        let rates = self.repository.current_rates(&mut tx).await?;

        let diamond_uuids: Vec<_> = rates
            .iter()
            .filter_map(|rate| match rate.material {
                Material::Diamond { diamond_type } => Some(diamond_type),
                Material::None | Material::Gold { .. } | Material::Silver { .. } => None,
            })
            .collect();

        let diamond_types: FxHashMap<_, _> = self
            .repository
            .get_diamond_types(&mut tx, &diamond_uuids)
            .await?
            .into_iter()
            .map(|diamond_type| (diamond_type.uuid.into_uuid(), diamond_type))
            .collect();

        tx.commit().await?;

        let mut catalog = MaterialTypeCatalog::default();

        for rate in &rates {
            match rate.material {
                Material::Gold { .. } => catalog.gold.push(MaterialTypeOption::from_rate(rate, None)),
                Material::Silver { .. } => {
                    catalog.silver.push(MaterialTypeOption::from_rate(rate, None));
                }
                Material::Diamond { diamond_type } => catalog.diamond.push(
                    MaterialTypeOption::from_rate(rate, diamond_types.get(&diamond_type)),
                ),
                Material::None => {}
            }
        }

        // Highest grade first.
        catalog.gold.sort_by_key(|option| Reverse(grade(&option.material)));
        catalog.silver.sort_by_key(|option| Reverse(grade(&option.material)));
        catalog.diamond.sort_by(|a, b| a.label.cmp(&b.label));

        Ok(catalog)
    }

    async fn list_diamond_types(&self) -> Result<Vec<DiamondType>, RatesServiceError> {
        let mut tx = self.db.begin().await?;

        let diamond_types = self.repository.list_diamond_types(&mut tx).await?;

        tx.commit().await?;

        Ok(diamond_types)
    }

    #[instrument(skip(self), fields(diamond_type_uuid = %diamond_type.uuid))]
    async fn create_diamond_type(
        &self,
        diamond_type: NewDiamondType,
    ) -> Result<DiamondType, RatesServiceError> {
        let diamond_type = NewDiamondType {
            shape: diamond_type.shape.trim().to_string(),
            color: diamond_type.color.trim().to_uppercase(),
            clarity: diamond_type.clarity.trim().to_uppercase(),
            ..diamond_type
        };

        if [&diamond_type.shape, &diamond_type.color, &diamond_type.clarity]
            .iter()
            .any(|value| value.is_empty())
        {
            return Err(RatesServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_diamond_type(&mut tx, &diamond_type)
            .await?;

        tx.commit().await?;

        info!(label = %created.label(), "diamond type created");

        Ok(created)
    }
}

/// Carat or purity mark; zero for diamonds.
fn grade(material: &Material) -> u16 {
    match material {
        Material::Gold { carat } => carat.carat(),
        Material::Silver { purity } => purity.mark(),
        Material::Diamond { .. } | Material::None => 0,
    }
}

#[automock]
#[async_trait]
pub trait RatesService: Send + Sync {
    /// List recorded rates, newest first, optionally for one material.
    async fn list_rates(
        &self,
        material: Option<MaterialKind>,
        page: PageRequest,
    ) -> Result<Page<MaterialRate>, RatesServiceError>;

    /// Record a rate snapshot.
    ///
    /// A diamond rate for an unknown diamond type fails with
    /// [`RatesServiceError::InvalidReference`].
    async fn create_rate(&self, rate: NewMaterialRate) -> Result<MaterialRate, RatesServiceError>;

    /// Delete a rate recorded in error.
    async fn delete_rate(&self, rate: RateUuid) -> Result<(), RatesServiceError>;

    /// Resolve the current rate for every discriminator in `demand`.
    async fn rate_book(&self, demand: &RateDemand) -> Result<RateBook, RatesServiceError>;

    /// Current rate per discriminator with display labels.
    async fn material_types(&self) -> Result<MaterialTypeCatalog, RatesServiceError>;

    /// List diamond types, newest first.
    async fn list_diamond_types(&self) -> Result<Vec<DiamondType>, RatesServiceError>;

    /// Catalogue a diamond type.
    async fn create_diamond_type(
        &self,
        diamond_type: NewDiamondType,
    ) -> Result<DiamondType, RatesServiceError>;
}
