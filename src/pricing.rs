//! Pricing
//!
//! Live sale prices are derived at read time from a product's fixed charges
//! and the current commodity rate for its material. Pricing never fails:
//! missing charges, weights or rates contribute zero.

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::{
    material::Material,
    money::{decimal_from_json, decimal_to_json, round_rupees},
    rates::{RateBook, RateDemand, RateUnit},
};

/// Attribute holding a metal product's weight in grams.
pub const WEIGHT_GRAMS_KEY: &str = "weightGrams";

/// Attribute keys checked, in order, for a diamond's carat weight.
pub const DIAMOND_CARAT_KEYS: [&str; 5] = [
    "diamondCarat",
    "carat",
    "carats",
    "weightCarat",
    "weightCarats",
];

/// Attribute the rounded asking price is published under.
pub const ASKING_PRICE_KEY: &str = "askingPriceInr";

/// Attribute the rounded material value is published under.
pub const MATERIAL_VALUE_KEY: &str = "materialValueInr";

/// Attribute the final price is published under.
pub const PRICE_KEY: &str = "priceInr";

/// Anything the engine can price.
pub trait Priceable {
    /// Making cost in rupees, if recorded.
    fn making_cost(&self) -> Option<Decimal>;

    /// Other charges in rupees, if recorded.
    fn other_charges(&self) -> Option<Decimal>;

    /// Material and discriminator.
    fn material(&self) -> &Material;

    /// Free-form attributes carrying weights and carats.
    fn attributes(&self) -> &Map<String, Value>;
}

/// A rate resolved while pricing, with the unit it is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRate {
    /// Quotation unit.
    pub unit: RateUnit,

    /// Rupees per unit.
    pub rate: Decimal,
}

/// The priced breakdown of one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    /// Making cost plus other charges, whole rupees.
    pub asking_price: Decimal,

    /// Commodity-derived value, whole rupees.
    pub material_value: Decimal,

    /// Sale price, whole rupees.
    pub price: Decimal,

    /// Rate used for the material value, when one was resolved.
    pub rate: Option<ResolvedRate>,
}

impl PriceBreakdown {
    /// Publish the breakdown into a product's attribute map.
    pub fn write_attributes(&self, attributes: &mut Map<String, Value>) {
        attributes.insert(ASKING_PRICE_KEY.to_string(), decimal_to_json(self.asking_price));
        attributes.insert(
            MATERIAL_VALUE_KEY.to_string(),
            decimal_to_json(self.material_value),
        );
        attributes.insert(PRICE_KEY.to_string(), decimal_to_json(self.price));

        if let Some(resolved) = self.rate {
            attributes.insert(
                resolved.unit.attribute_key().to_string(),
                decimal_to_json(resolved.rate),
            );
        }
    }
}

/// Making cost plus other charges, rounded, never negative.
#[must_use]
pub fn asking_price(making_cost: Option<Decimal>, other_charges: Option<Decimal>) -> Decimal {
    let total = making_cost
        .unwrap_or_default()
        .saturating_add(other_charges.unwrap_or_default());

    round_rupees(total.max(Decimal::ZERO))
}

/// Unrounded material value and the rate it was derived from.
///
/// Returns zero without a rate whenever the material has no rate in the book
/// or the product lacks a positive weight (or carat, for diamonds).
#[must_use]
pub fn material_value(
    material: &Material,
    attributes: &Map<String, Value>,
    rates: &RateBook,
) -> (Decimal, Option<ResolvedRate>) {
    let Some(kind) = material.kind() else {
        return (Decimal::ZERO, None);
    };

    let quantity = match material {
        Material::None => None,
        Material::Gold { .. } | Material::Silver { .. } => positive_attribute(attributes, WEIGHT_GRAMS_KEY),
        Material::Diamond { .. } => diamond_carat(attributes),
    };

    let (Some(quantity), Some(rate)) = (quantity, rates.rate_for(material)) else {
        return (Decimal::ZERO, None);
    };

    let unit = RateUnit::from(kind);

    let per_unit = match unit {
        RateUnit::Per10Gram => rate / Decimal::TEN,
        RateUnit::PerKg => rate / Decimal::ONE_THOUSAND,
        RateUnit::PerCarat => rate,
    };

    let value = per_unit
        .checked_mul(quantity)
        .unwrap_or(Decimal::ZERO);

    (value, Some(ResolvedRate { unit, rate }))
}

/// Price a single product against a rate snapshot.
pub fn price_product<P: Priceable + ?Sized>(product: &P, rates: &RateBook) -> PriceBreakdown {
    let asking = asking_price(product.making_cost(), product.other_charges());
    let (value, rate) = material_value(product.material(), product.attributes(), rates);

    PriceBreakdown {
        asking_price: asking,
        material_value: round_rupees(value),
        price: round_rupees(asking.saturating_add(value)),
        rate,
    }
}

/// Discriminators a batch of products needs priced.
pub fn rate_demand<'a, P: Priceable + 'a>(products: impl IntoIterator<Item = &'a P>) -> RateDemand {
    RateDemand::from_materials(products.into_iter().map(Priceable::material))
}

/// Price every product against one snapshot, in input order.
pub fn price_batch<P: Priceable>(products: &[P], rates: &RateBook) -> Vec<PriceBreakdown> {
    products
        .iter()
        .map(|product| price_product(product, rates))
        .collect()
}

/// First positive carat weight among the accepted attribute aliases.
#[must_use]
pub fn diamond_carat(attributes: &Map<String, Value>) -> Option<Decimal> {
    DIAMOND_CARAT_KEYS
        .iter()
        .find_map(|key| positive_attribute(attributes, key))
}

fn positive_attribute(attributes: &Map<String, Value>, key: &str) -> Option<Decimal> {
    attributes
        .get(key)
        .and_then(decimal_from_json)
        .filter(|value| *value > Decimal::ZERO)
}
