//! Product request and response models.

use karat::material::Material;
use karat_app::domain::products::models::{NewProduct, PricedProduct, ProductUpdate, ProductUuid};
use rust_decimal::Decimal;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::products::material_error;

/// A catalog product priced against the current rates.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,

    #[serde(with = "rust_decimal::serde::float_option")]
    #[salvo(schema(value_type = Option<f64>))]
    pub making_cost: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    #[salvo(schema(value_type = Option<f64>))]
    pub other_charges: Option<Decimal>,

    pub stock: u32,

    /// `gold`, `silver`, `diamond` or null
    pub material: Option<String>,

    /// Carat, purity mark or diamond type UUID
    pub material_type: Value,

    /// Free-form attributes with the computed pricing fields written in
    pub attributes: Value,

    pub images: Vec<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub is_best_seller: bool,

    /// Live sale price in whole rupees
    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub price_inr: Decimal,

    pub created_at: String,
    pub updated_at: String,
}

impl From<PricedProduct> for ProductResponse {
    fn from(priced: PricedProduct) -> Self {
        let price_inr = priced.price();
        let product = priced.product;

        Self {
            id: product.uuid.into_uuid(),
            name: product.name,
            slug: product.slug,
            description: product.description,
            making_cost: product.making_cost,
            other_charges: product.other_charges,
            stock: product.stock,
            material: product.material.kind().map(|kind| kind.as_str().to_string()),
            material_type: product.material.material_type(),
            attributes: Value::Object(product.attributes),
            images: product.images,
            is_active: product.is_active,
            is_featured: product.is_featured,
            is_best_seller: product.is_best_seller,
            price_inr,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateProductRequest {
    pub name: String,

    /// Derived from the name when omitted
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[salvo(schema(value_type = Option<f64>))]
    pub making_cost: Option<Decimal>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[salvo(schema(value_type = Option<f64>))]
    pub other_charges: Option<Decimal>,

    #[serde(default)]
    pub stock: u32,

    #[serde(default)]
    pub material: Option<String>,

    #[serde(default)]
    pub material_type: Option<Value>,

    #[serde(default)]
    pub attributes: Option<Value>,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    pub is_best_seller: bool,
}

impl TryFrom<CreateProductRequest> for NewProduct {
    type Error = StatusError;

    fn try_from(request: CreateProductRequest) -> Result<Self, Self::Error> {
        if request.name.trim().is_empty() {
            return Err(StatusError::bad_request().brief("Product name is required"));
        }

        let material = Material::from_parts(
            request.material.as_deref(),
            request.material_type.as_ref(),
        )
        .map_err(|error| material_error(&error))?;

        Ok(NewProduct {
            uuid: ProductUuid::new(),
            name: request.name.trim().to_string(),
            slug: request.slug,
            description: request.description,
            making_cost: request.making_cost,
            other_charges: request.other_charges,
            stock: request.stock,
            material,
            attributes: attributes_map(request.attributes)?.unwrap_or_default(),
            images: request.images,
            is_active: request.is_active,
            is_featured: request.is_featured,
            is_best_seller: request.is_best_seller,
        })
    }
}

/// Update Product Request
///
/// Omitted fields keep their stored value. Sending either `material` or `materialType`
/// replaces the material as a whole.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[salvo(schema(value_type = Option<f64>))]
    pub making_cost: Option<Decimal>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[salvo(schema(value_type = Option<f64>))]
    pub other_charges: Option<Decimal>,

    #[serde(default)]
    pub stock: Option<u32>,

    #[serde(default)]
    pub material: Option<String>,

    #[serde(default)]
    pub material_type: Option<Value>,

    #[serde(default)]
    pub attributes: Option<Value>,

    #[serde(default)]
    pub images: Option<Vec<String>>,

    #[serde(default)]
    pub is_active: Option<bool>,

    #[serde(default)]
    pub is_featured: Option<bool>,

    #[serde(default)]
    pub is_best_seller: Option<bool>,
}

impl TryFrom<UpdateProductRequest> for ProductUpdate {
    type Error = StatusError;

    fn try_from(request: UpdateProductRequest) -> Result<Self, Self::Error> {
        let material = if request.material.is_some() || request.material_type.is_some() {
            Some(
                Material::from_parts(request.material.as_deref(), request.material_type.as_ref())
                    .map_err(|error| material_error(&error))?,
            )
        } else {
            None
        };

        if request
            .name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(StatusError::bad_request().brief("Product name is required"));
        }

        Ok(ProductUpdate {
            name: request.name.map(|name| name.trim().to_string()),
            slug: request.slug,
            description: request.description,
            making_cost: request.making_cost,
            other_charges: request.other_charges,
            stock: request.stock,
            material,
            attributes: attributes_map(request.attributes)?,
            images: request.images,
            is_active: request.is_active,
            is_featured: request.is_featured,
            is_best_seller: request.is_best_seller,
        })
    }
}

fn attributes_map(attributes: Option<Value>) -> Result<Option<Map<String, Value>>, StatusError> {
    match attributes {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(StatusError::bad_request().brief("attributes must be an object")),
    }
}

#[cfg(test)]
mod tests {
    use karat::material::GoldCarat;
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn create_request(body: Value) -> Result<CreateProductRequest, serde_json::Error> {
        serde_json::from_value(body)
    }

    #[test]
    fn create_request_parses_material_pair() -> TestResult {
        let product = NewProduct::try_from(create_request(json!({
            "name": "Classic Band",
            "makingCost": 500,
            "material": "gold",
            "materialType": "22",
            "attributes": { "weightGrams": 5 }
        }))?)?;

        assert_eq!(
            product.material,
            Material::Gold {
                carat: GoldCarat::K22
            }
        );
        assert_eq!(product.making_cost, Some(Decimal::from(500)));
        assert!(product.is_active, "products are active unless stated");

        Ok(())
    }

    #[test]
    fn create_request_rejects_unsupported_carat() -> TestResult {
        let result = NewProduct::try_from(create_request(json!({
            "name": "Odd Ring",
            "material": "gold",
            "materialType": 21
        }))?);

        assert!(result.is_err(), "21K gold should be rejected");

        Ok(())
    }

    #[test]
    fn create_request_rejects_non_object_attributes() -> TestResult {
        let result = NewProduct::try_from(create_request(json!({
            "name": "Odd Ring",
            "attributes": [1, 2]
        }))?);

        assert!(result.is_err(), "array attributes should be rejected");

        Ok(())
    }

    #[test]
    fn update_without_material_keeps_it() -> TestResult {
        let update = ProductUpdate::try_from(UpdateProductRequest {
            stock: Some(3),
            ..UpdateProductRequest::default()
        })?;

        assert_eq!(update.material, None);
        assert_eq!(update.stock, Some(3));

        Ok(())
    }

    #[test]
    fn update_to_none_material_clears_it() -> TestResult {
        let update = ProductUpdate::try_from(UpdateProductRequest {
            material: Some("none".to_string()),
            ..UpdateProductRequest::default()
        })?;

        assert_eq!(update.material, Some(Material::None));

        Ok(())
    }
}
