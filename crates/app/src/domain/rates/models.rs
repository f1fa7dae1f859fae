//! Rate Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use karat::{material::Material, rates::RateUnit};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Rate UUID
pub type RateUuid = TypedUuid<MaterialRate>;

/// Diamond Type UUID
pub type DiamondTypeUuid = TypedUuid<DiamondType>;

/// A recorded commodity rate. Rates are never updated; corrections delete and re-add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialRate {
    pub uuid: RateUuid,
    pub material: Material,
    pub rate: Decimal,
    pub effective_at: Timestamp,
    pub created_at: Timestamp,
}

impl MaterialRate {
    /// Unit the rate is quoted in.
    #[must_use]
    pub fn unit(&self) -> Option<RateUnit> {
        self.material.kind().map(RateUnit::from)
    }

    /// Derived purity: `carat / 24` for gold and `mark / 10` for silver.
    #[must_use]
    pub fn purity_percent(&self) -> Option<Decimal> {
        match self.material {
            Material::Gold { carat } => Some(carat.purity_percent()),
            Material::Silver { purity } => Some(purity.percent()),
            Material::Diamond { .. } | Material::None => None,
        }
    }
}

/// New Rate Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMaterialRate {
    pub uuid: RateUuid,
    pub material: Material,
    pub rate: Decimal,

    /// Defaults to the time of insertion.
    pub effective_at: Option<Timestamp>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownDiamondAttribute {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiamondOrigin {
    Natural,
    LabGrown,
}

impl DiamondOrigin {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Natural => "natural",
            Self::LabGrown => "lab_grown",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Natural => "Natural",
            Self::LabGrown => "Lab-Grown",
        }
    }
}

impl FromStr for DiamondOrigin {
    type Err = UnknownDiamondAttribute;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "natural" => Ok(Self::Natural),
            "lab_grown" => Ok(Self::LabGrown),
            _ => Err(UnknownDiamondAttribute {
                kind: "diamond origin",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for DiamondOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiamondCut {
    Excellent,
    VeryGood,
    Good,
}

impl DiamondCut {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::VeryGood => "very_good",
            Self::Good => "good",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
        }
    }
}

impl FromStr for DiamondCut {
    type Err = UnknownDiamondAttribute;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "excellent" => Ok(Self::Excellent),
            "very_good" => Ok(Self::VeryGood),
            "good" => Ok(Self::Good),
            _ => Err(UnknownDiamondAttribute {
                kind: "diamond cut",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for DiamondCut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalogued diamond grade that diamond rates are quoted against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiamondType {
    pub uuid: DiamondTypeUuid,
    pub origin: DiamondOrigin,
    pub shape: String,
    pub cut: DiamondCut,
    pub color: String,
    pub clarity: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DiamondType {
    /// e.g. `Natural / Round / Excellent / D / VVS1`.
    #[must_use]
    pub fn label(&self) -> String {
        [
            self.origin.label(),
            self.shape.as_str(),
            self.cut.label(),
            self.color.as_str(),
            self.clarity.as_str(),
        ]
        .join(" / ")
    }
}

/// New Diamond Type Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDiamondType {
    pub uuid: DiamondTypeUuid,
    pub origin: DiamondOrigin,
    pub shape: String,
    pub cut: DiamondCut,
    pub color: String,
    pub clarity: String,
}

/// A selectable material discriminator with its current rate, for admin product forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialTypeOption {
    pub material: Material,
    pub label: String,
    pub purity_percent: Option<Decimal>,
    pub rate: Decimal,
}

impl MaterialTypeOption {
    /// Build the option for a current rate. Diamond labels use the diamond type when known.
    #[must_use]
    pub fn from_rate(rate: &MaterialRate, diamond_type: Option<&DiamondType>) -> Self {
        let price = rate.rate.normalize();

        let label = match rate.material {
            Material::Gold { carat } => format!(
                "{}k ({})({price})",
                carat.carat(),
                carat.purity_percent().normalize()
            ),
            Material::Silver { purity } => {
                format!("{} ({})({price})", purity.mark(), purity.percent().normalize())
            }
            Material::Diamond { diamond_type: uuid } => {
                let base = diamond_type.map_or_else(|| uuid.to_string(), DiamondType::label);

                format!("{base} ({price})")
            }
            Material::None => price.to_string(),
        };

        Self {
            material: rate.material,
            label,
            purity_percent: rate.purity_percent(),
            rate: rate.rate,
        }
    }
}

/// Current rate per discriminator, grouped by material.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialTypeCatalog {
    pub gold: Vec<MaterialTypeOption>,
    pub silver: Vec<MaterialTypeOption>,
    pub diamond: Vec<MaterialTypeOption>,
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use karat::material::{GoldCarat, SilverPurity};
    use uuid::Uuid;

    use super::*;

    fn rate(material: Material, amount: Decimal) -> MaterialRate {
        MaterialRate {
            uuid: RateUuid::new(),
            material,
            rate: amount,
            effective_at: Timestamp::UNIX_EPOCH,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn gold_option_label_shows_purity_and_rate() {
        let option = MaterialTypeOption::from_rate(
            &rate(
                Material::Gold {
                    carat: GoldCarat::K22,
                },
                Decimal::new(60000_00, 2),
            ),
            None,
        );

        assert_eq!(option.label, "22k (91.67)(60000)");
        assert_eq!(option.purity_percent, Some(Decimal::new(9167, 2)));
    }

    #[test]
    fn silver_option_label_shows_mark() {
        let option = MaterialTypeOption::from_rate(
            &rate(
                Material::Silver {
                    purity: SilverPurity::Sterling,
                },
                Decimal::from(75000),
            ),
            None,
        );

        assert_eq!(option.label, "925 (92.5)(75000)");
    }

    #[test]
    fn diamond_option_label_uses_type_when_known() {
        let uuid = Uuid::now_v7();
        let diamond = DiamondType {
            uuid: DiamondTypeUuid::from_uuid(uuid),
            origin: DiamondOrigin::LabGrown,
            shape: "Round".to_string(),
            cut: DiamondCut::VeryGood,
            color: "E".to_string(),
            clarity: "VS1".to_string(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        };
        let current = rate(Material::Diamond { diamond_type: uuid }, Decimal::from(45000));

        assert_eq!(
            MaterialTypeOption::from_rate(&current, Some(&diamond)).label,
            "Lab-Grown / Round / Very Good / E / VS1 (45000)"
        );
        assert_eq!(
            MaterialTypeOption::from_rate(&current, None).label,
            format!("{uuid} (45000)")
        );
    }

    #[test]
    fn diamond_attributes_parse_loose_spellings() {
        assert_eq!("Lab-Grown".parse(), Ok(DiamondOrigin::LabGrown));
        assert_eq!("very good".parse(), Ok(DiamondCut::VeryGood));
        assert!("fair".parse::<DiamondCut>().is_err());
    }
}
