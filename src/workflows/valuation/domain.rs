use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::update::InputError;

/// Binary answer used by every amenity field of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub const fn as_str(self) -> &'static str {
        match self {
            YesNo::Yes => "yes",
            YesNo::No => "no",
        }
    }
}

/// Furnishing level reported for the property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FurnishingStatus {
    Unfurnished,
    SemiFurnished,
    Furnished,
}

impl FurnishingStatus {
    pub const ALL: [FurnishingStatus; 3] = [
        FurnishingStatus::Unfurnished,
        FurnishingStatus::SemiFurnished,
        FurnishingStatus::Furnished,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FurnishingStatus::Unfurnished => "unfurnished",
            FurnishingStatus::SemiFurnished => "semi-furnished",
            FurnishingStatus::Furnished => "furnished",
        }
    }
}

/// Integer-valued fields of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountField {
    Bedrooms,
    Bathrooms,
    Stories,
    Parking,
}

/// Yes/no amenity fields of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureField {
    MainRoad,
    GuestRoom,
    Basement,
    HotWaterHeating,
    AirConditioning,
    PreferredArea,
}

/// Every field of [`AttributeRecord`], named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeField {
    Area,
    Count(CountField),
    Feature(FeatureField),
    FurnishingStatus,
}

impl AttributeField {
    pub const ALL: [AttributeField; 12] = [
        AttributeField::Area,
        AttributeField::Count(CountField::Bedrooms),
        AttributeField::Count(CountField::Bathrooms),
        AttributeField::Count(CountField::Stories),
        AttributeField::Count(CountField::Parking),
        AttributeField::Feature(FeatureField::MainRoad),
        AttributeField::Feature(FeatureField::GuestRoom),
        AttributeField::Feature(FeatureField::Basement),
        AttributeField::Feature(FeatureField::HotWaterHeating),
        AttributeField::Feature(FeatureField::AirConditioning),
        AttributeField::Feature(FeatureField::PreferredArea),
        AttributeField::FurnishingStatus,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            AttributeField::Area => "area",
            AttributeField::Count(CountField::Bedrooms) => "bedrooms",
            AttributeField::Count(CountField::Bathrooms) => "bathrooms",
            AttributeField::Count(CountField::Stories) => "stories",
            AttributeField::Count(CountField::Parking) => "parking",
            AttributeField::Feature(FeatureField::MainRoad) => "mainroad",
            AttributeField::Feature(FeatureField::GuestRoom) => "guestroom",
            AttributeField::Feature(FeatureField::Basement) => "basement",
            AttributeField::Feature(FeatureField::HotWaterHeating) => "hotwaterheating",
            AttributeField::Feature(FeatureField::AirConditioning) => "airconditioning",
            AttributeField::Feature(FeatureField::PreferredArea) => "prefarea",
            AttributeField::FurnishingStatus => "furnishingstatus",
        }
    }
}

impl fmt::Display for AttributeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeField {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        AttributeField::ALL
            .into_iter()
            .find(|field| field.as_str() == wanted)
            .ok_or_else(|| InputError::UnknownField(value.to_string()))
    }
}

/// Characteristics of one property submitted for valuation.
///
/// Serializes to the exact request body expected by the valuation service:
/// twelve keys, numbers as JSON numbers, enumerations as their literal strings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeRecord {
    pub area: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub stories: u32,
    pub parking: u32,
    #[serde(rename = "mainroad")]
    pub main_road: YesNo,
    #[serde(rename = "guestroom")]
    pub guest_room: YesNo,
    pub basement: YesNo,
    #[serde(rename = "hotwaterheating")]
    pub hot_water_heating: YesNo,
    #[serde(rename = "airconditioning")]
    pub air_conditioning: YesNo,
    #[serde(rename = "prefarea")]
    pub preferred_area: YesNo,
    #[serde(rename = "furnishingstatus")]
    pub furnishing_status: FurnishingStatus,
}

impl Default for AttributeRecord {
    /// Baseline shown when a form session starts.
    fn default() -> Self {
        Self {
            area: 6000.0,
            bedrooms: 3,
            bathrooms: 2,
            stories: 2,
            parking: 1,
            main_road: YesNo::Yes,
            guest_room: YesNo::No,
            basement: YesNo::Yes,
            hot_water_heating: YesNo::No,
            air_conditioning: YesNo::Yes,
            preferred_area: YesNo::No,
            furnishing_status: FurnishingStatus::SemiFurnished,
        }
    }
}

impl AttributeRecord {
    pub const fn count(&self, field: CountField) -> u32 {
        match field {
            CountField::Bedrooms => self.bedrooms,
            CountField::Bathrooms => self.bathrooms,
            CountField::Stories => self.stories,
            CountField::Parking => self.parking,
        }
    }

    pub const fn feature(&self, field: FeatureField) -> YesNo {
        match field {
            FeatureField::MainRoad => self.main_road,
            FeatureField::GuestRoom => self.guest_room,
            FeatureField::Basement => self.basement,
            FeatureField::HotWaterHeating => self.hot_water_heating,
            FeatureField::AirConditioning => self.air_conditioning,
            FeatureField::PreferredArea => self.preferred_area,
        }
    }

    /// Current value of `field` rendered the way it travels on the wire.
    pub fn display_value(&self, field: AttributeField) -> String {
        match field {
            AttributeField::Area => self.area.to_string(),
            AttributeField::Count(count) => self.count(count).to_string(),
            AttributeField::Feature(feature) => self.feature(feature).as_str().to_string(),
            AttributeField::FurnishingStatus => self.furnishing_status.as_str().to_string(),
        }
    }
}
