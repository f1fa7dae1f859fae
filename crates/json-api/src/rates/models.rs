//! Rate request and response models.

use jiff::Timestamp;
use karat::{material::Material, rates::RateUnit};
use karat_app::domain::rates::models::{
    DiamondCut, DiamondOrigin, DiamondType, DiamondTypeUuid, MaterialRate, MaterialTypeCatalog,
    MaterialTypeOption, NewDiamondType, NewMaterialRate, RateUuid,
};
use rust_decimal::Decimal;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::products::material_error;

fn unit_name(unit: RateUnit) -> &'static str {
    match unit {
        RateUnit::Per10Gram => "per_10_gram",
        RateUnit::PerKg => "per_kg",
        RateUnit::PerCarat => "per_carat",
    }
}

/// A recorded rate snapshot.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RateResponse {
    pub id: Uuid,
    pub material: Option<String>,
    pub material_type: Value,
    pub label: Option<String>,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub rate: Decimal,

    /// `per_10_gram`, `per_kg` or `per_carat`
    pub unit: Option<String>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[salvo(schema(value_type = Option<f64>))]
    pub purity_percent: Option<Decimal>,

    pub effective_at: String,
    pub created_at: String,
}

impl From<MaterialRate> for RateResponse {
    fn from(rate: MaterialRate) -> Self {
        Self {
            id: rate.uuid.into_uuid(),
            material: rate.material.kind().map(|kind| kind.as_str().to_string()),
            material_type: rate.material.material_type(),
            label: rate.material.label(),
            rate: rate.rate,
            unit: rate.unit().map(|unit| unit_name(unit).to_string()),
            purity_percent: rate.purity_percent(),
            effective_at: rate.effective_at.to_string(),
            created_at: rate.created_at.to_string(),
        }
    }
}

/// Create Rate Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateRateRequest {
    /// `gold`, `silver` or `diamond`
    pub material: String,

    /// Carat, purity mark or diamond type UUID
    pub material_type: Value,

    /// Per 10 grams for gold, per kilogram for silver, per carat for diamond
    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub rate: Decimal,

    /// RFC 3339 timestamp; defaults to now
    #[serde(default)]
    pub effective_at: Option<String>,
}

impl TryFrom<CreateRateRequest> for NewMaterialRate {
    type Error = StatusError;

    fn try_from(request: CreateRateRequest) -> Result<Self, Self::Error> {
        let material =
            Material::from_parts(Some(request.material.as_str()), Some(&request.material_type))
                .map_err(|error| material_error(&error))?;

        if material == Material::None {
            return Err(StatusError::bad_request().brief("material is required"));
        }

        if request.rate.is_sign_negative() {
            return Err(StatusError::bad_request().brief("rate must not be negative"));
        }

        let effective_at = request
            .effective_at
            .as_deref()
            .map(|raw| {
                raw.trim().parse::<Timestamp>().map_err(|_ignored| {
                    StatusError::bad_request().brief("effectiveAt must be an RFC 3339 timestamp")
                })
            })
            .transpose()?;

        Ok(NewMaterialRate {
            uuid: RateUuid::new(),
            material,
            rate: request.rate,
            effective_at,
        })
    }
}

/// One selectable discriminator and its current rate.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MaterialTypeResponse {
    /// The `materialType` to send with a product
    pub value: Value,
    pub label: String,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[salvo(schema(value_type = Option<f64>))]
    pub purity_percent: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub rate: Decimal,
}

impl From<MaterialTypeOption> for MaterialTypeResponse {
    fn from(option: MaterialTypeOption) -> Self {
        Self {
            value: option.material.material_type(),
            label: option.label,
            purity_percent: option.purity_percent,
            rate: option.rate,
        }
    }
}

/// Current rates grouped by material.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MaterialTypesResponse {
    pub gold: Vec<MaterialTypeResponse>,
    pub silver: Vec<MaterialTypeResponse>,
    pub diamond: Vec<MaterialTypeResponse>,
}

impl From<MaterialTypeCatalog> for MaterialTypesResponse {
    fn from(catalog: MaterialTypeCatalog) -> Self {
        let convert = |options: Vec<MaterialTypeOption>| -> Vec<MaterialTypeResponse> {
            options.into_iter().map(Into::into).collect()
        };

        Self {
            gold: convert(catalog.gold),
            silver: convert(catalog.silver),
            diamond: convert(catalog.diamond),
        }
    }
}

/// A catalogued diamond grade.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DiamondTypeResponse {
    pub id: Uuid,
    pub origin: String,
    pub shape: String,
    pub cut: String,
    pub color: String,
    pub clarity: String,
    pub label: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<DiamondType> for DiamondTypeResponse {
    fn from(diamond_type: DiamondType) -> Self {
        Self {
            id: diamond_type.uuid.into_uuid(),
            origin: diamond_type.origin.as_str().to_string(),
            label: diamond_type.label(),
            shape: diamond_type.shape,
            cut: diamond_type.cut.as_str().to_string(),
            color: diamond_type.color,
            clarity: diamond_type.clarity,
            created_at: diamond_type.created_at.to_string(),
            updated_at: diamond_type.updated_at.to_string(),
        }
    }
}

/// Create Diamond Type Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateDiamondTypeRequest {
    /// `natural` or `lab_grown`
    pub origin: String,
    pub shape: String,

    /// `excellent`, `very_good` or `good`
    pub cut: String,
    pub color: String,
    pub clarity: String,
}

impl TryFrom<CreateDiamondTypeRequest> for NewDiamondType {
    type Error = StatusError;

    fn try_from(request: CreateDiamondTypeRequest) -> Result<Self, Self::Error> {
        let origin = request
            .origin
            .parse::<DiamondOrigin>()
            .map_err(|error| StatusError::bad_request().brief(format!("{error}")))?;

        let cut = request
            .cut
            .parse::<DiamondCut>()
            .map_err(|error| StatusError::bad_request().brief(format!("{error}")))?;

        let required = |value: String, field: &str| {
            let value = value.trim().to_string();

            if value.is_empty() {
                Err(StatusError::bad_request().brief(format!("{field} is required")))
            } else {
                Ok(value)
            }
        };

        Ok(NewDiamondType {
            uuid: DiamondTypeUuid::new(),
            origin,
            shape: required(request.shape, "shape")?,
            cut,
            color: required(request.color, "color")?,
            clarity: required(request.clarity, "clarity")?,
        })
    }
}
