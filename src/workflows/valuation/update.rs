use tracing::debug;

use super::domain::{
    AttributeField, AttributeRecord, CountField, FeatureField, FurnishingStatus, YesNo,
};

/// Inclusive bounds enforced on every write to `parking`.
pub const PARKING_RANGE: (u32, u32) = (0, 10);

/// A single-field change to an [`AttributeRecord`].
///
/// Each variant carries a value from the field's own domain, so a numeric
/// value can never land in an enumerated field or the other way round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldUpdate {
    Area(f64),
    Count(CountField, f64),
    Feature(FeatureField, YesNo),
    Furnishing(FurnishingStatus),
}

impl FieldUpdate {
    pub const fn field(&self) -> AttributeField {
        match self {
            FieldUpdate::Area(_) => AttributeField::Area,
            FieldUpdate::Count(field, _) => AttributeField::Count(*field),
            FieldUpdate::Feature(field, _) => AttributeField::Feature(*field),
            FieldUpdate::Furnishing(_) => AttributeField::FurnishingStatus,
        }
    }

    /// Builds an update from a wire field name and the raw text a widget produced.
    ///
    /// Numeric text that does not parse becomes NaN, which [`AttributeRecord::apply`]
    /// ignores. Enumerated text outside the field's set is rejected.
    pub fn parse(field: &str, raw: &str) -> Result<Self, InputError> {
        let field: AttributeField = field.parse()?;
        Self::for_field(field, raw)
    }

    pub fn for_field(field: AttributeField, raw: &str) -> Result<Self, InputError> {
        let update = match field {
            AttributeField::Area => FieldUpdate::Area(coerce_number(raw)),
            AttributeField::Count(count) => FieldUpdate::Count(count, coerce_number(raw)),
            AttributeField::Feature(feature) => {
                FieldUpdate::Feature(feature, parse_yes_no(field, raw)?)
            }
            AttributeField::FurnishingStatus => FieldUpdate::Furnishing(parse_furnishing(raw)?),
        };
        Ok(update)
    }
}

/// Raised when raw input names a field or option outside the closed schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown attribute field '{0}'")]
    UnknownField(String),
    #[error("'{value}' is not an allowed value for {field}")]
    UnsupportedValue {
        field: AttributeField,
        value: String,
    },
}

/// Lenient numeric coercion: anything that is not a number becomes NaN.
pub fn coerce_number(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_yes_no(field: AttributeField, raw: &str) -> Result<YesNo, InputError> {
    match raw.trim() {
        "yes" => Ok(YesNo::Yes),
        "no" => Ok(YesNo::No),
        other => Err(InputError::UnsupportedValue {
            field,
            value: other.to_string(),
        }),
    }
}

fn parse_furnishing(raw: &str) -> Result<FurnishingStatus, InputError> {
    let wanted = raw.trim();
    FurnishingStatus::ALL
        .into_iter()
        .find(|status| status.as_str() == wanted)
        .ok_or_else(|| InputError::UnsupportedValue {
            field: AttributeField::FurnishingStatus,
            value: wanted.to_string(),
        })
}

fn normalize_area(requested: f64, previous: f64) -> f64 {
    if requested.is_finite() && requested > 0.0 {
        requested
    } else {
        previous
    }
}

fn normalize_count(field: CountField, requested: f64, previous: u32) -> u32 {
    if !requested.is_finite() {
        return previous;
    }

    // `as` saturates: negatives become 0, oversized values u32::MAX.
    let value = requested.round() as u32;
    match field {
        CountField::Parking => value.clamp(PARKING_RANGE.0, PARKING_RANGE.1),
        _ => value,
    }
}

impl AttributeRecord {
    /// Returns a copy of the record with exactly one field replaced.
    pub fn apply(&self, update: FieldUpdate) -> AttributeRecord {
        let mut next = *self;
        match update {
            FieldUpdate::Area(requested) => {
                next.area = normalize_area(requested, self.area);
            }
            FieldUpdate::Count(field, requested) => {
                let value = normalize_count(field, requested, self.count(field));
                match field {
                    CountField::Bedrooms => next.bedrooms = value,
                    CountField::Bathrooms => next.bathrooms = value,
                    CountField::Stories => next.stories = value,
                    CountField::Parking => next.parking = value,
                }
            }
            FieldUpdate::Feature(field, value) => match field {
                FeatureField::MainRoad => next.main_road = value,
                FeatureField::GuestRoom => next.guest_room = value,
                FeatureField::Basement => next.basement = value,
                FeatureField::HotWaterHeating => next.hot_water_heating = value,
                FeatureField::AirConditioning => next.air_conditioning = value,
                FeatureField::PreferredArea => next.preferred_area = value,
            },
            FieldUpdate::Furnishing(status) => {
                next.furnishing_status = status;
            }
        }

        if next == *self {
            debug!(field = %update.field(), "field update left record unchanged");
        }
        next
    }
}
