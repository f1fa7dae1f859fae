//! Materials
//!
//! A product's precious-metal content. The discriminator that selects a
//! commodity rate depends on the material, so the pair is modelled as one
//! tagged value rather than two loosely related fields.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while interpreting a material and its discriminator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaterialError {
    /// The material name is not one of gold, silver or diamond.
    #[error("unknown material: {0}")]
    UnknownMaterial(String),

    /// A material was given without a discriminator.
    #[error("material type is required for {0}")]
    MissingMaterialType(MaterialKind),

    /// The gold carat is not one of the traded caratages.
    #[error("unsupported gold carat: {0}")]
    UnsupportedCarat(String),

    /// The silver purity mark is not one of the hallmarked grades.
    #[error("unsupported silver purity mark: {0}")]
    UnsupportedPurityMark(String),

    /// The diamond type reference is not a UUID.
    #[error("invalid diamond type reference: {0}")]
    InvalidDiamondType(String),
}

/// Material family, without a discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Gold, priced per 10 grams.
    Gold,

    /// Silver, priced per kilogram.
    Silver,

    /// Diamond, priced per carat.
    Diamond,
}

impl MaterialKind {
    /// All material kinds.
    pub const ALL: [Self; 3] = [Self::Gold, Self::Silver, Self::Diamond];

    /// Wire name of the material.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Diamond => "diamond",
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialKind {
    type Err = MaterialError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gold" => Ok(Self::Gold),
            "silver" => Ok(Self::Silver),
            "diamond" => Ok(Self::Diamond),
            other => Err(MaterialError::UnknownMaterial(other.to_string())),
        }
    }
}

/// Traded gold caratages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GoldCarat {
    /// 24 carat.
    K24,
    /// 22 carat.
    K22,
    /// 20 carat.
    K20,
    /// 18 carat.
    K18,
    /// 14 carat.
    K14,
}

impl GoldCarat {
    /// Carat number.
    #[must_use]
    pub const fn carat(self) -> u16 {
        match self {
            Self::K24 => 24,
            Self::K22 => 22,
            Self::K20 => 20,
            Self::K18 => 18,
            Self::K14 => 14,
        }
    }

    /// Gold content as a percentage, to two decimal places.
    #[must_use]
    pub fn purity_percent(self) -> Decimal {
        (Decimal::from(self.carat()) * Decimal::ONE_HUNDRED / Decimal::from(24)).round_dp(2)
    }
}

impl TryFrom<u16> for GoldCarat {
    type Error = MaterialError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            24 => Ok(Self::K24),
            22 => Ok(Self::K22),
            20 => Ok(Self::K20),
            18 => Ok(Self::K18),
            14 => Ok(Self::K14),
            other => Err(MaterialError::UnsupportedCarat(other.to_string())),
        }
    }
}

/// Hallmarked silver purity grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SilverPurity {
    /// 999 fine silver.
    Fine,
    /// 925 sterling silver.
    Sterling,
    /// 900 coin silver.
    Coin,
    /// 800 silver.
    Standard,
}

impl SilverPurity {
    /// Purity mark in parts per thousand.
    #[must_use]
    pub const fn mark(self) -> u16 {
        match self {
            Self::Fine => 999,
            Self::Sterling => 925,
            Self::Coin => 900,
            Self::Standard => 800,
        }
    }

    /// Silver content as a percentage.
    #[must_use]
    pub fn percent(self) -> Decimal {
        Decimal::new(i64::from(self.mark()), 1)
    }
}

impl TryFrom<u16> for SilverPurity {
    type Error = MaterialError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            999 => Ok(Self::Fine),
            925 => Ok(Self::Sterling),
            900 => Ok(Self::Coin),
            800 => Ok(Self::Standard),
            other => Err(MaterialError::UnsupportedPurityMark(other.to_string())),
        }
    }
}

/// A product's material together with the discriminator selecting its rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Material {
    /// No live pricing contribution.
    #[default]
    None,

    /// Gold of the given caratage.
    Gold {
        /// Caratage.
        carat: GoldCarat,
    },

    /// Silver of the given purity.
    Silver {
        /// Purity grade.
        purity: SilverPurity,
    },

    /// Diamond of a catalogued diamond type.
    Diamond {
        /// Diamond type reference.
        diamond_type: Uuid,
    },
}

impl Material {
    /// Build a material from its wire form: a material name plus a loosely typed
    /// discriminator (number or numeric string for metals, UUID string for diamonds).
    ///
    /// An absent, empty or `"none"` material yields [`Material::None`] and ignores
    /// the discriminator.
    ///
    /// # Errors
    ///
    /// Returns a [`MaterialError`] if the name is unknown or the discriminator is
    /// missing or out of range for the material.
    pub fn from_parts(kind: Option<&str>, material_type: Option<&Value>) -> Result<Self, MaterialError> {
        let Some(kind) = kind.map(str::trim).filter(|kind| !kind.is_empty()) else {
            return Ok(Self::None);
        };

        if kind.eq_ignore_ascii_case("none") {
            return Ok(Self::None);
        }

        let kind = kind.parse::<MaterialKind>()?;

        let raw = match material_type {
            None | Some(Value::Null) => return Err(MaterialError::MissingMaterialType(kind)),
            Some(Value::String(text)) => text.trim().to_string(),
            Some(other) => other.to_string(),
        };

        if raw.is_empty() {
            return Err(MaterialError::MissingMaterialType(kind));
        }

        Self::from_discriminator(kind, &raw)
    }

    /// Build a material from a kind and its textual discriminator, as stored.
    ///
    /// # Errors
    ///
    /// Returns a [`MaterialError`] if the discriminator is out of range.
    pub fn from_discriminator(kind: MaterialKind, discriminator: &str) -> Result<Self, MaterialError> {
        let discriminator = discriminator.trim();

        match kind {
            MaterialKind::Gold => {
                let carat = discriminator
                    .parse::<u16>()
                    .map_err(|_parse| MaterialError::UnsupportedCarat(discriminator.to_string()))?;

                Ok(Self::Gold {
                    carat: GoldCarat::try_from(carat)?,
                })
            }
            MaterialKind::Silver => {
                let mark = discriminator.parse::<u16>().map_err(|_parse| {
                    MaterialError::UnsupportedPurityMark(discriminator.to_string())
                })?;

                Ok(Self::Silver {
                    purity: SilverPurity::try_from(mark)?,
                })
            }
            MaterialKind::Diamond => {
                let diamond_type = discriminator
                    .parse::<Uuid>()
                    .map_err(|_parse| MaterialError::InvalidDiamondType(discriminator.to_string()))?;

                Ok(Self::Diamond { diamond_type })
            }
        }
    }

    /// Material family, if any.
    #[must_use]
    pub const fn kind(&self) -> Option<MaterialKind> {
        match self {
            Self::None => None,
            Self::Gold { .. } => Some(MaterialKind::Gold),
            Self::Silver { .. } => Some(MaterialKind::Silver),
            Self::Diamond { .. } => Some(MaterialKind::Diamond),
        }
    }

    /// Textual discriminator as stored alongside rates.
    #[must_use]
    pub fn discriminator(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Gold { carat } => Some(carat.carat().to_string()),
            Self::Silver { purity } => Some(purity.mark().to_string()),
            Self::Diamond { diamond_type } => Some(diamond_type.to_string()),
        }
    }

    /// Discriminator in its wire form: a number for metals, a string for diamonds.
    #[must_use]
    pub fn material_type(&self) -> Value {
        match self {
            Self::None => Value::Null,
            Self::Gold { carat } => Value::from(carat.carat()),
            Self::Silver { purity } => Value::from(purity.mark()),
            Self::Diamond { diamond_type } => Value::from(diamond_type.to_string()),
        }
    }

    /// Short human label, e.g. `22K Gold`.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Gold { carat } => Some(format!("{}K Gold", carat.carat())),
            Self::Silver { purity } => Some(format!("{} Silver", purity.mark())),
            Self::Diamond { .. } => Some("Diamond".to_string()),
        }
    }
}
