//! Rates
//!
//! A [`RateBook`] is a snapshot of the current commodity rate per discriminator.
//! A [`RateDemand`] lists the discriminators a set of products needs, so the
//! snapshot can be loaded with one grouped lookup instead of one per product.

use rust_decimal::Decimal;
use rustc_hash::{FxHashMap, FxHashSet};
use uuid::Uuid;

use crate::material::{GoldCarat, Material, MaterialKind, SilverPurity};

/// Unit a commodity rate is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateUnit {
    /// Rupees per 10 grams (gold).
    Per10Gram,

    /// Rupees per kilogram (silver).
    PerKg,

    /// Rupees per carat (diamond).
    PerCarat,
}

impl RateUnit {
    /// Attribute key the resolved rate is published under.
    #[must_use]
    pub const fn attribute_key(self) -> &'static str {
        match self {
            Self::Per10Gram => "materialRatePer10Gram",
            Self::PerKg => "materialRatePerKg",
            Self::PerCarat => "materialPricePerCarat",
        }
    }
}

impl From<MaterialKind> for RateUnit {
    fn from(kind: MaterialKind) -> Self {
        match kind {
            MaterialKind::Gold => Self::Per10Gram,
            MaterialKind::Silver => Self::PerKg,
            MaterialKind::Diamond => Self::PerCarat,
        }
    }
}

/// Distinct discriminators needed to price a set of products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateDemand {
    gold: FxHashSet<GoldCarat>,
    silver: FxHashSet<SilverPurity>,
    diamond: FxHashSet<Uuid>,
}

impl RateDemand {
    /// Collect the discriminators of every material given.
    pub fn from_materials<'a>(materials: impl IntoIterator<Item = &'a Material>) -> Self {
        let mut demand = Self::default();

        for material in materials {
            demand.require(material);
        }

        demand
    }

    /// Add a material's discriminator. [`Material::None`] adds nothing.
    pub fn require(&mut self, material: &Material) {
        match material {
            Material::None => {}
            Material::Gold { carat } => {
                self.gold.insert(*carat);
            }
            Material::Silver { purity } => {
                self.silver.insert(*purity);
            }
            Material::Diamond { diamond_type } => {
                self.diamond.insert(*diamond_type);
            }
        }
    }

    /// True when no product needs a rate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gold.is_empty() && self.silver.is_empty() && self.diamond.is_empty()
    }

    /// Demanded `(material, discriminator)` pairs in storage form.
    #[must_use]
    pub fn pairs(&self) -> Vec<(MaterialKind, String)> {
        let gold = self
            .gold
            .iter()
            .map(|carat| (MaterialKind::Gold, carat.carat().to_string()));

        let silver = self
            .silver
            .iter()
            .map(|purity| (MaterialKind::Silver, purity.mark().to_string()));

        let diamond = self
            .diamond
            .iter()
            .map(|diamond_type| (MaterialKind::Diamond, diamond_type.to_string()));

        gold.chain(silver).chain(diamond).collect()
    }
}

/// Current rate per discriminator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateBook {
    gold: FxHashMap<GoldCarat, Decimal>,
    silver: FxHashMap<SilverPurity, Decimal>,
    diamond: FxHashMap<Uuid, Decimal>,
}

impl RateBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current rate for a material. Non-positive rates and
    /// [`Material::None`] are ignored; returns whether the rate was recorded.
    pub fn insert(&mut self, material: &Material, rate: Decimal) -> bool {
        if rate <= Decimal::ZERO {
            return false;
        }

        match material {
            Material::None => return false,
            Material::Gold { carat } => {
                self.gold.insert(*carat, rate);
            }
            Material::Silver { purity } => {
                self.silver.insert(*purity, rate);
            }
            Material::Diamond { diamond_type } => {
                self.diamond.insert(*diamond_type, rate);
            }
        }

        true
    }

    /// Builder form of [`RateBook::insert`].
    #[must_use]
    pub fn with_rate(mut self, material: Material, rate: Decimal) -> Self {
        self.insert(&material, rate);
        self
    }

    /// Current rate for a material, if one is known.
    #[must_use]
    pub fn rate_for(&self, material: &Material) -> Option<Decimal> {
        match material {
            Material::None => None,
            Material::Gold { carat } => self.gold.get(carat).copied(),
            Material::Silver { purity } => self.silver.get(purity).copied(),
            Material::Diamond { diamond_type } => self.diamond.get(diamond_type).copied(),
        }
    }

    /// Number of rates in the book.
    #[must_use]
    pub fn len(&self) -> usize {
        self.gold.len() + self.silver.len() + self.diamond.len()
    }

    /// True when the book holds no rates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
