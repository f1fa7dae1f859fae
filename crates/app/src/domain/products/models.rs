//! Product Models

use jiff::Timestamp;
use karat::{
    material::Material,
    money::decimal_to_json,
    pricing::{PriceBreakdown, Priceable, price_product},
    rates::RateBook,
};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Attribute holding the derived metal purity.
pub const PURITY_KEY: &str = "purity";

/// Catalog product as stored. Prices are never stored; see [`PricedProduct`].
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub making_cost: Option<Decimal>,
    pub other_charges: Option<Decimal>,
    pub stock: u32,
    pub material: Material,
    pub attributes: Map<String, Value>,
    pub images: Vec<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub is_best_seller: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Priceable for Product {
    fn making_cost(&self) -> Option<Decimal> {
        self.making_cost
    }

    fn other_charges(&self) -> Option<Decimal> {
        self.other_charges
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

/// A product with its live price written into its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedProduct {
    pub product: Product,
    pub pricing: PriceBreakdown,
}

impl PricedProduct {
    /// Price a product against a rate snapshot.
    #[must_use]
    pub fn new(mut product: Product, rates: &RateBook) -> Self {
        let pricing = price_product(&product, rates);

        pricing.write_attributes(&mut product.attributes);

        Self { product, pricing }
    }

    /// Sale price in whole rupees.
    #[must_use]
    pub fn price(&self) -> Decimal {
        self.pricing.price
    }
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,

    /// Derived from the name when absent.
    pub slug: Option<String>,
    pub description: String,
    pub making_cost: Option<Decimal>,
    pub other_charges: Option<Decimal>,
    pub stock: u32,
    pub material: Material,
    pub attributes: Map<String, Value>,
    pub images: Vec<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub is_best_seller: bool,
}

/// Product Update Model
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub making_cost: Option<Decimal>,
    pub other_charges: Option<Decimal>,
    pub stock: Option<u32>,
    pub material: Option<Material>,
    pub attributes: Option<Map<String, Value>>,
    pub images: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub is_best_seller: Option<bool>,
}

impl ProductUpdate {
    /// Apply the update to a stored product. A new name without an explicit slug
    /// re-derives the slug.
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            if self.slug.is_none() {
                product.slug = slugify(&name);
            }
            product.name = name;
        }

        if let Some(slug) = self.slug {
            product.slug = slug;
        }

        if let Some(description) = self.description {
            product.description = description;
        }

        if let Some(making_cost) = self.making_cost {
            product.making_cost = Some(making_cost);
        }

        if let Some(other_charges) = self.other_charges {
            product.other_charges = Some(other_charges);
        }

        if let Some(stock) = self.stock {
            product.stock = stock;
        }

        if let Some(material) = self.material {
            product.material = material;
        }

        if let Some(attributes) = self.attributes {
            product.attributes = attributes;
        }

        if let Some(images) = self.images {
            product.images = images;
        }

        if let Some(is_active) = self.is_active {
            product.is_active = is_active;
        }

        if let Some(is_featured) = self.is_featured {
            product.is_featured = is_featured;
        }

        if let Some(is_best_seller) = self.is_best_seller {
            product.is_best_seller = is_best_seller;
        }
    }
}

/// How a storefront request names a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductKey {
    Uuid(ProductUuid),
    Slug(String),
}

impl ProductKey {
    /// UUIDs are tried first; anything else is a slug.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        Uuid::try_parse(raw).map_or_else(
            |_not_uuid| Self::Slug(raw.to_lowercase()),
            |uuid| Self::Uuid(ProductUuid::from_uuid(uuid)),
        )
    }
}

/// URL slug for a product name: lowercase, whitespace runs become `-`, and
/// anything outside `[a-z0-9-]` is dropped.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Keep the `purity` attribute in step with the material: metals carry their
/// purity percentage, everything else has none.
pub fn sync_purity(material: &Material, attributes: &mut Map<String, Value>) {
    let purity = match material {
        Material::Gold { carat } => Some(carat.purity_percent()),
        Material::Silver { purity } => Some(purity.percent()),
        Material::Diamond { .. } | Material::None => None,
    };

    match purity {
        Some(purity) => {
            attributes.insert(PURITY_KEY.to_string(), decimal_to_json(purity));
        }
        None => {
            attributes.remove(PURITY_KEY);
        }
    }
}

#[cfg(test)]
mod tests {
    use karat::material::{GoldCarat, SilverPurity};
    use serde_json::json;

    use super::*;

    #[test]
    fn slugify_collapses_whitespace_and_strips_symbols() {
        assert_eq!(slugify("  Classic   Gold Ring! "), "classic-gold-ring");
        assert_eq!(slugify("Rose & Pearl Stud 22K"), "rose-pearl-stud-22k");
        assert_eq!(slugify("pre-owned\tbangle"), "pre-owned-bangle");
    }

    #[test]
    fn product_key_prefers_uuid() {
        let uuid = Uuid::now_v7();

        assert_eq!(
            ProductKey::parse(&uuid.to_string()),
            ProductKey::Uuid(ProductUuid::from_uuid(uuid))
        );
        assert_eq!(
            ProductKey::parse("Gold-Ring"),
            ProductKey::Slug("gold-ring".to_string())
        );
    }

    #[test]
    fn sync_purity_tracks_material() {
        let mut attributes = Map::new();

        sync_purity(
            &Material::Silver {
                purity: SilverPurity::Sterling,
            },
            &mut attributes,
        );
        assert_eq!(attributes.get(PURITY_KEY), Some(&json!(92.5)));

        sync_purity(
            &Material::Gold {
                carat: GoldCarat::K24,
            },
            &mut attributes,
        );
        assert_eq!(attributes.get(PURITY_KEY), Some(&json!(100)));

        sync_purity(&Material::None, &mut attributes);
        assert_eq!(attributes.get(PURITY_KEY), None);
    }

    #[test]
    fn update_with_new_name_rederives_slug() {
        let mut product = Product {
            uuid: ProductUuid::new(),
            name: "Old".to_string(),
            slug: "old".to_string(),
            description: String::new(),
            making_cost: None,
            other_charges: None,
            stock: 1,
            material: Material::None,
            attributes: Map::new(),
            images: Vec::new(),
            is_active: true,
            is_featured: false,
            is_best_seller: false,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        };

        ProductUpdate {
            name: Some("Temple Necklace".to_string()),
            stock: Some(4),
            ..ProductUpdate::default()
        }
        .apply(&mut product);

        assert_eq!(product.slug, "temple-necklace");
        assert_eq!(product.stock, 4);
        assert!(product.is_active);
    }
}
