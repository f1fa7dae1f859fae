//! Promo code request and response models.

use jiff::Timestamp;
use karat::promo::DiscountType;
use karat_app::domain::promocodes::models::{
    NewPromoCode, PromoCode, PromoCodeUpdate, PromoCodeUuid, PromoValidation,
};
use rust_decimal::Decimal;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn discount_type(raw: &str) -> Result<DiscountType, StatusError> {
    raw.parse::<DiscountType>()
        .map_err(|error| StatusError::bad_request().brief(error.to_string()))
}

fn default_true() -> bool {
    true
}

/// A promo code.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromoCodeResponse {
    pub id: Uuid,
    pub code: String,
    pub description: String,

    /// `percent` or `fixed`
    pub discount_type: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub amount: Decimal,

    #[serde(with = "rust_decimal::serde::float_option")]
    #[salvo(schema(value_type = Option<f64>))]
    pub max_discount: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    #[salvo(schema(value_type = Option<f64>))]
    pub min_order_value: Option<Decimal>,

    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub usage_limit: Option<u32>,
    pub used_count: u32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PromoCode> for PromoCodeResponse {
    fn from(promo: PromoCode) -> Self {
        Self {
            id: promo.uuid.into_uuid(),
            code: promo.code,
            description: promo.description,
            discount_type: promo.discount_type.as_str().to_string(),
            amount: promo.amount,
            max_discount: promo.max_discount,
            min_order_value: promo.min_order_value,
            starts_at: promo.starts_at.map(|at| at.to_string()),
            ends_at: promo.ends_at.map(|at| at.to_string()),
            usage_limit: promo.usage_limit,
            used_count: promo.used_count,
            is_active: promo.is_active,
            created_at: promo.created_at.to_string(),
            updated_at: promo.updated_at.to_string(),
        }
    }
}

/// Create Promo Code Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatePromoCodeRequest {
    /// Stored trimmed and uppercase
    pub code: String,

    #[serde(default)]
    pub description: String,

    /// `percent` or `fixed`
    pub discount_type: String,

    #[salvo(schema(value_type = f64))]
    pub amount: Decimal,

    #[serde(default)]
    #[salvo(schema(value_type = Option<f64>))]
    pub max_discount: Option<Decimal>,

    #[serde(default)]
    #[salvo(schema(value_type = Option<f64>))]
    pub min_order_value: Option<Decimal>,

    #[serde(default)]
    #[salvo(schema(value_type = Option<String>))]
    pub starts_at: Option<Timestamp>,

    #[serde(default)]
    #[salvo(schema(value_type = Option<String>))]
    pub ends_at: Option<Timestamp>,

    #[serde(default)]
    pub usage_limit: Option<u32>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl TryFrom<CreatePromoCodeRequest> for NewPromoCode {
    type Error = StatusError;

    fn try_from(request: CreatePromoCodeRequest) -> Result<Self, Self::Error> {
        Ok(NewPromoCode {
            uuid: PromoCodeUuid::new(),
            code: request.code,
            description: request.description,
            discount_type: discount_type(&request.discount_type)?,
            amount: request.amount,
            max_discount: request.max_discount,
            min_order_value: request.min_order_value,
            starts_at: request.starts_at,
            ends_at: request.ends_at,
            usage_limit: request.usage_limit,
            is_active: request.is_active,
        })
    }
}

/// Update Promo Code Request
///
/// Omitted fields keep their value; `null` clears a nullable field.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdatePromoCodeRequest {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub discount_type: Option<String>,

    #[serde(default)]
    #[salvo(schema(value_type = Option<f64>))]
    pub amount: Option<Decimal>,

    #[serde(default, deserialize_with = "nullable")]
    #[salvo(schema(value_type = Option<f64>))]
    pub max_discount: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "nullable")]
    #[salvo(schema(value_type = Option<f64>))]
    pub min_order_value: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "nullable")]
    #[salvo(schema(value_type = Option<String>))]
    pub starts_at: Option<Option<Timestamp>>,

    #[serde(default, deserialize_with = "nullable")]
    #[salvo(schema(value_type = Option<String>))]
    pub ends_at: Option<Option<Timestamp>>,

    #[serde(default, deserialize_with = "nullable")]
    #[salvo(schema(value_type = Option<u32>))]
    pub usage_limit: Option<Option<u32>>,

    #[serde(default)]
    pub used_count: Option<u32>,

    #[serde(default)]
    pub is_active: Option<bool>,
}

impl TryFrom<UpdatePromoCodeRequest> for PromoCodeUpdate {
    type Error = StatusError;

    fn try_from(request: UpdatePromoCodeRequest) -> Result<Self, Self::Error> {
        Ok(PromoCodeUpdate {
            code: request.code,
            description: request.description,
            discount_type: request.discount_type.as_deref().map(discount_type).transpose()?,
            amount: request.amount,
            max_discount: request.max_discount,
            min_order_value: request.min_order_value,
            starts_at: request.starts_at,
            ends_at: request.ends_at,
            usage_limit: request.usage_limit,
            used_count: request.used_count,
            is_active: request.is_active,
        })
    }
}

/// Validate Promo Code Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidatePromoCodeRequest {
    pub code: String,

    /// Cart subtotal in rupees
    #[salvo(schema(value_type = f64))]
    pub order_total: Decimal,
}

/// An accepted promo code's effect on the given total.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromoValidationResponse {
    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub discount: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub total_after: Decimal,

    pub promo: PromoCodeResponse,
}

impl From<PromoValidation> for PromoValidationResponse {
    fn from(validation: PromoValidation) -> Self {
        Self {
            discount: validation.outcome.discount,
            total_after: validation.outcome.total_after,
            promo: validation.promo.into(),
        }
    }
}
